//! Completion notifier trait and HTTP implementation.

use serde_json::json;
use url::Url;

use crate::provider::{HttpClient, HttpRequest, SendOutcome};

/// Trait for reporting job completion to an external caller.
///
/// Notification is best-effort and fire-and-forget from the
/// orchestrator's perspective: implementations log their own failures
/// and never propagate or retry them.
pub trait CompletionNotifier: Send + Sync {
    /// Reports that a job has completed.
    ///
    /// `results` is the job's full aggregate result; `unique_id` and
    /// `report_id` are the job's correlation tokens.
    fn notify(
        &self,
        results: &[SendOutcome],
        unique_id: &str,
        report_id: Option<&str>,
    ) -> impl std::future::Future<Output = ()> + Send;
}

/// HTTP webhook notifier posting a completion envelope.
///
/// Sends a single POST with `{"status": "completed", "unique_id",
/// "report_id"}`. The per-recipient results are accepted but not
/// embedded in the payload; the envelope only correlates the job.
#[derive(Debug, Clone)]
pub struct WebhookNotifier<C> {
    client: C,
    url: Url,
}

impl<C> WebhookNotifier<C> {
    /// Creates a notifier posting to the given webhook URL.
    #[must_use]
    pub const fn new(client: C, url: Url) -> Self {
        Self { client, url }
    }

    /// Returns the configured webhook URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl<C: HttpClient> CompletionNotifier for WebhookNotifier<C> {
    async fn notify(&self, results: &[SendOutcome], unique_id: &str, report_id: Option<&str>) {
        tracing::debug!(
            "Notifying completion of {unique_id} ({} outcomes)",
            results.len()
        );

        let payload = json!({
            "status": "completed",
            "unique_id": unique_id,
            "report_id": report_id,
        });
        let request = HttpRequest::post(self.url.clone()).with_json(&payload);

        match self.client.request(request).await {
            Ok(response) if response.is_success() => {
                tracing::info!("Successfully notified user via webhook.");
            }
            Ok(response) => {
                tracing::error!(
                    "Failed to notify user. Status: {}, Response: {}",
                    response.status,
                    response.body_text(),
                );
            }
            Err(e) => {
                tracing::error!("Error notifying user via webhook: {e}");
            }
        }
    }
}
