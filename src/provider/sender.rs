//! Per-recipient message sending against the provider API.

use url::Url;

use super::payload::{MessageKind, build_payload};
use super::{FailureKind, HttpClient, HttpRequest, SendOutcome};

/// Default Graph API version for the messaging endpoint.
pub const DEFAULT_API_VERSION: &str = "v20.0";

/// Sends one message per invocation to the provider's per-endpoint
/// messaging path and interprets the HTTP response into a
/// [`SendOutcome`].
///
/// Exactly one attempt is made per invocation; there are no retries.
/// Every failure mode is absorbed into the returned outcome so that a
/// failing recipient can never abort its batch.
///
/// # Example
///
/// ```no_run
/// use bulk_relay::provider::{MessageSender, ReqwestClient, MessageKind};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sender = MessageSender::new(
///     ReqwestClient::new()?,
///     Url::parse("https://graph.facebook.com")?,
/// );
/// let kind = MessageKind::Probe { text: "hello".into() };
/// let outcome = sender.send("token", "1234", &kind, "15551230001", &[]).await;
/// println!("success: {}", outcome.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MessageSender<C> {
    client: C,
    base: Url,
    api_version: String,
}

impl<C> MessageSender<C> {
    /// Creates a sender targeting the given Graph API base URL with the
    /// default API version.
    #[must_use]
    pub fn new(client: C, base: Url) -> Self {
        Self {
            client,
            base,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Overrides the Graph API version segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Builds the per-endpoint messaging URL.
    pub(crate) fn messages_url(&self, phone_number_id: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}/{}/messages",
            self.base.as_str().trim_end_matches('/'),
            self.api_version,
            phone_number_id,
        ))
    }
}

impl<C: HttpClient> MessageSender<C> {
    /// Sends one message to one recipient.
    ///
    /// `variables` is the recipient's effective substitution set. The
    /// result is always an outcome, never an error: HTTP 200 is
    /// success, any other status is a provider rejection carrying the
    /// status and body, and a transport fault is a client-error
    /// classification carrying the stringified fault.
    pub async fn send(
        &self,
        token: &str,
        phone_number_id: &str,
        kind: &MessageKind,
        recipient: &str,
        variables: &[String],
    ) -> SendOutcome {
        let url = match self.messages_url(phone_number_id) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Invalid messaging URL for {recipient}: {e}");
                return SendOutcome::Failed {
                    recipient: recipient.to_string(),
                    kind: FailureKind::Transport,
                    detail: e.to_string(),
                };
            }
        };

        let payload = build_payload(kind, recipient, variables);
        let request = HttpRequest::post(url).with_bearer(token).with_json(&payload);

        match self.client.request(request).await {
            Ok(response) if response.status == http::StatusCode::OK => SendOutcome::Success {
                recipient: recipient.to_string(),
                response: response.body_text(),
            },
            Ok(response) => {
                let detail = response.body_text();
                tracing::error!(
                    "Failed to send message to {recipient}. Status: {status}, Error: {detail}",
                    status = response.status,
                );
                SendOutcome::Failed {
                    recipient: recipient.to_string(),
                    kind: FailureKind::Status(response.status),
                    detail,
                }
            }
            Err(e) => {
                tracing::error!("Error sending message to {recipient}: {e}");
                SendOutcome::Failed {
                    recipient: recipient.to_string(),
                    kind: FailureKind::Transport,
                    detail: e.to_string(),
                }
            }
        }
    }
}
