//! Template metadata lookup.
//!
//! Resolves a template name to its registered metadata via the
//! provider's `message_templates` listing. Used by the carousel path,
//! which needs the template's registered language before dispatch.

use thiserror::Error;
use url::Url;

use super::{HttpClient, HttpError, HttpRequest};

/// Graph API version used by the template listing endpoint.
pub const TEMPLATES_API_VERSION: &str = "v14.0";

/// Error type for template lookups.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with the requested name is registered.
    #[error("Template with name {name} not found")]
    NotFound {
        /// The requested template name.
        name: String,
    },

    /// The provider rejected the listing request.
    #[error("Failed to get template details. Status code: {status}")]
    Rejected {
        /// HTTP status of the rejection.
        status: http::StatusCode,
        /// Response body text.
        body: String,
    },

    /// The listing response was not the expected JSON shape.
    #[error("Malformed template listing response")]
    Malformed,

    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Metadata of one registered template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDetails {
    /// Template name.
    pub name: String,
    /// Registered language code.
    pub language: String,
    /// The full template object as returned by the provider.
    pub raw: serde_json::Value,
}

/// Looks up registered templates by name.
#[derive(Debug, Clone)]
pub struct TemplateLookup<C> {
    client: C,
    base: Url,
}

impl<C> TemplateLookup<C> {
    /// Creates a lookup targeting the given Graph API base URL.
    #[must_use]
    pub const fn new(client: C, base: Url) -> Self {
        Self { client, base }
    }
}

impl<C: HttpClient> TemplateLookup<C> {
    /// Fetches metadata for the template registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the listing contains no
    /// exact name match, [`TemplateError::Rejected`] for non-200
    /// responses, and [`TemplateError::Http`] for transport faults.
    pub async fn fetch(
        &self,
        token: &str,
        waba_id: &str,
        name: &str,
    ) -> Result<TemplateDetails, TemplateError> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}/message_templates",
            self.base.as_str().trim_end_matches('/'),
            TEMPLATES_API_VERSION,
            waba_id,
        ))
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("name", name);

        let request = HttpRequest::get(url).with_bearer(token);
        let response = self.client.request(request).await?;

        if response.status != http::StatusCode::OK {
            tracing::error!(
                "Failed to get template details. Status code: {}",
                response.status
            );
            return Err(TemplateError::Rejected {
                status: response.status,
                body: response.body_text(),
            });
        }

        let listing = response.body_json().ok_or(TemplateError::Malformed)?;
        let templates = listing
            .get("data")
            .and_then(serde_json::Value::as_array)
            .ok_or(TemplateError::Malformed)?;

        for template in templates {
            if template.get("name").and_then(serde_json::Value::as_str) == Some(name) {
                let language = template
                    .get("language")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                return Ok(TemplateDetails {
                    name: name.to_string(),
                    language,
                    raw: template.clone(),
                });
            }
        }

        tracing::error!("Template with name {name} not found.");
        Err(TemplateError::NotFound {
            name: name.to_string(),
        })
    }
}
