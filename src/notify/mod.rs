//! Job completion notification layer.
//!
//! Provides the [`CompletionNotifier`] trait and the production
//! [`WebhookNotifier`] that posts the completion envelope to the
//! configured external webhook.

mod notifier;


pub use notifier::{CompletionNotifier, WebhookNotifier};
