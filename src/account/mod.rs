//! Account and credit validation collaborator.
//!
//! The relay consults an external account service before dispatching:
//! a lookup interface resolving caller credentials to a provider
//! profile, and a reserve interface debiting message credits and
//! opening a delivery report. Both are abstracted behind
//! [`AccountService`] so the orchestrator can be tested without the
//! remote service.

use serde::Deserialize;
use thiserror::Error;

use crate::provider::HttpError;

mod client;


pub use client::HttpAccountService;

/// Error type for account validation and credit reservation.
///
/// The `status_code` mapping mirrors what the inbound surface reports
/// to callers: 401 invalid credentials, 403 inactive account, 402
/// insufficient balance.
#[derive(Debug, Error)]
pub enum AccountError {
    /// No account matches the supplied `user_id`/`api_token` pair.
    #[error("Failed to validate user credentials. Please check your user_id and api_token")]
    InvalidCredentials,

    /// The account exists but is deactivated.
    #[error("User account is not active. Please contact support")]
    Inactive,

    /// The account holds fewer credits than the job requires.
    #[error(
        "Insufficient coins. Please recharge your account (available: {available}, required: {required})"
    )]
    InsufficientBalance {
        /// Credits currently available in the relevant category.
        available: u64,
        /// Credits the job would consume (one per recipient).
        required: u64,
    },

    /// The account service answered with a non-success status.
    #[error("Account service error (status {status}): {detail}")]
    Service {
        /// Upstream HTTP status.
        status: http::StatusCode,
        /// Response body text.
        detail: String,
    },

    /// Transport-level failure reaching the account service.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl AccountError {
    /// The HTTP status the inbound surface reports for this rejection.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials => 401,
            Self::InsufficientBalance { .. } => 402,
            Self::Inactive => 403,
            Self::Service { status, .. } => status.as_u16(),
            Self::Http(_) => 500,
        }
    }
}

/// Provider profile resolved from a validated account.
///
/// Field names follow the account service's wire schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountProfile {
    /// WhatsApp Business account id.
    #[serde(rename = "whatsapp_business_account_id")]
    pub waba_id: String,
    /// Provider endpoint id messages are sent through.
    pub phone_number_id: String,
    /// Registered application id.
    #[serde(rename = "register_app__app_id")]
    pub app_id: String,
    /// Provider bearer token of the registered application.
    #[serde(rename = "register_app__token")]
    pub token: String,
    /// General-purpose credit balance.
    #[serde(default)]
    pub coins: u64,
    /// Marketing-category credit balance.
    #[serde(default)]
    pub marketing_coins: u64,
    /// Authentication-category credit balance.
    #[serde(default)]
    pub authentication_coins: u64,
}

/// Credit category a job draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinCategory {
    /// Marketing templates, carousels, flows, bot messages.
    Marketing,
    /// OTP / authentication templates.
    Authentication,
    /// Uncategorized sends (e.g. number-validation probes).
    Utility,
}

impl CoinCategory {
    /// Uppercase name used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Marketing => "MARKETING",
            Self::Authentication => "AUTHENTICATION",
            Self::Utility => "UTILITY",
        }
    }

    /// The balance this category draws from.
    #[must_use]
    pub const fn balance(self, profile: &AccountProfile) -> u64 {
        match self {
            Self::Marketing => profile.marketing_coins,
            Self::Authentication => profile.authentication_coins,
            Self::Utility => profile.coins,
        }
    }
}

/// Checks that the profile can cover `required` credits in `category`.
///
/// # Errors
///
/// Returns [`AccountError::InsufficientBalance`] when it cannot.
pub const fn ensure_balance(
    profile: &AccountProfile,
    category: CoinCategory,
    required: u64,
) -> Result<(), AccountError> {
    let available = category.balance(profile);
    if required > available {
        return Err(AccountError::InsufficientBalance {
            available,
            required,
        });
    }
    Ok(())
}

/// A credit reservation opening a delivery report for one job.
#[derive(Debug, Clone, Copy)]
pub struct ReserveRequest<'a> {
    /// Caller account id.
    pub user_id: &'a str,
    /// Caller API token.
    pub api_token: &'a str,
    /// Credits to reserve (one per recipient).
    pub coins: u64,
    /// The job's recipient list.
    pub recipients: &'a [String],
    /// Template the job sends, recorded in the report.
    pub template_name: &'a str,
    /// Credit category the job draws from.
    pub category: CoinCategory,
}

/// Trait for the external account service.
pub trait AccountService: Send + Sync {
    /// Resolves caller credentials to a provider profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] when no account
    /// matches and [`AccountError::Inactive`] for deactivated accounts.
    fn lookup(
        &self,
        user_id: &str,
        api_token: &str,
    ) -> impl std::future::Future<Output = Result<AccountProfile, AccountError>> + Send;

    /// Reserves credits for a job and returns the opened report id.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Service`] when the service rejects the
    /// reservation.
    fn reserve(
        &self,
        request: ReserveRequest<'_>,
    ) -> impl std::future::Future<Output = Result<String, AccountError>> + Send;
}
