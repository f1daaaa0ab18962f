//! Provider API layer for outbound messaging.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Message body construction per kind ([`MessageKind`], [`build_payload`])
//! - Per-recipient sending ([`MessageSender`], [`SendOutcome`])
//! - Template metadata lookup ([`TemplateLookup`])
//! - Media uploads ([`MediaUploader`])

mod client;
mod error;
mod http;
mod media;
mod outcome;
mod payload;
mod sender;
mod template;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod payload_tests;
#[cfg(test)]
mod sender_tests;

pub use client::{ClientOptions, ReqwestClient};
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use media::{MediaError, MediaFile, MediaUploader};
pub use outcome::{FailureKind, SendOutcome};
pub use payload::{BotMessage, MediaKind, MessageKind, TemplateContext, build_payload};
pub use sender::{DEFAULT_API_VERSION, MessageSender};
pub use template::{TemplateDetails, TemplateError, TemplateLookup};
