//! HTTP implementation of the account service collaborator.

use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::provider::{HttpClient, HttpError, HttpRequest};

use super::{AccountError, AccountProfile, AccountService, ReserveRequest};

/// One record in the account service's user listing.
#[derive(Debug, Deserialize)]
struct UserRecord {
    user_id: String,
    api_token: String,
    #[serde(default)]
    is_active: bool,
    #[serde(flatten)]
    profile: AccountProfile,
}

/// Production [`AccountService`] talking to the remote account store.
#[derive(Debug, Clone)]
pub struct HttpAccountService<C> {
    client: C,
    base: Url,
}

impl<C> HttpAccountService<C> {
    /// Creates a service client targeting the given base URL.
    #[must_use]
    pub const fn new(client: C, base: Url) -> Self {
        Self { client, base }
    }

    fn endpoint(&self, path: &str) -> Result<Url, HttpError> {
        Url::parse(&format!(
            "{}/{path}",
            self.base.as_str().trim_end_matches('/'),
        ))
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }
}

impl<C: HttpClient> AccountService for HttpAccountService<C> {
    async fn lookup(&self, user_id: &str, api_token: &str) -> Result<AccountProfile, AccountError> {
        let url = self.endpoint("api/users/")?;
        let response = self.client.request(HttpRequest::get(url)).await?;

        if response.status != http::StatusCode::OK {
            return Err(AccountError::Service {
                status: response.status,
                detail: "Failed to connect to user validation service".into(),
            });
        }

        let users: Vec<UserRecord> = serde_json::from_slice(&response.body).map_err(|e| {
            tracing::error!("Error in user validation: {e}");
            AccountError::Service {
                status: response.status,
                detail: format!("Malformed user listing: {e}"),
            }
        })?;

        let user = users
            .into_iter()
            .find(|u| u.user_id == user_id && u.api_token == api_token)
            .ok_or(AccountError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AccountError::Inactive);
        }

        Ok(user.profile)
    }

    async fn reserve(&self, request: ReserveRequest<'_>) -> Result<String, AccountError> {
        let url = self.endpoint("update-balance-report/")?;

        let phone_numbers = request.recipients.join(",");
        let all_contact: Vec<i64> = request
            .recipients
            .iter()
            .filter_map(|phone| phone.trim().trim_start_matches('+').parse().ok())
            .collect();

        let payload = json!({
            "user_id": request.user_id,
            "api_token": request.api_token,
            "coins": request.coins,
            "phone_numbers": phone_numbers,
            "all_contact": all_contact,
            "template_name": request.template_name,
            "category": request.category.wire_name(),
        });

        let response = self
            .client
            .request(HttpRequest::post(url).with_json(&payload))
            .await?;

        if response.status != http::StatusCode::OK {
            let detail = response.body_text();
            tracing::error!("Failed to update balance and report: {detail}");
            return Err(AccountError::Service {
                status: response.status,
                detail,
            });
        }

        response
            .body_json()
            .and_then(|body| {
                body.get("report_id")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            })
            .ok_or_else(|| AccountError::Service {
                status: response.status,
                detail: "Reservation response carried no report_id".into(),
            })
    }
}
