//! Per-recipient send outcome types.

use std::fmt;

/// Classification of a failed send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider answered with a non-success HTTP status.
    Status(http::StatusCode),
    /// The request never produced a response (connection reset,
    /// timeout, DNS failure).
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{}", status.as_u16()),
            Self::Transport => f.write_str("client_error"),
        }
    }
}

/// The result of one send attempt for one recipient.
///
/// Exactly one outcome is produced per recipient per job; outcomes are
/// never retried or mutated after creation. The dispatcher accumulates
/// them into the job's aggregate result in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The provider accepted the message (HTTP 200). The response body
    /// is kept as delivery evidence.
    Success {
        /// The recipient the message was addressed to.
        recipient: String,
        /// Raw provider response body.
        response: String,
    },

    /// The send attempt completed but the provider rejected it, or the
    /// transport failed before a response arrived.
    Failed {
        /// The recipient the message was addressed to.
        recipient: String,
        /// HTTP status or transport classification.
        kind: FailureKind,
        /// Raw error/response text.
        detail: String,
    },

    /// The send task itself failed unexpectedly (e.g. panicked) before
    /// producing a proper outcome.
    Error {
        /// The recipient the message was addressed to.
        recipient: String,
        /// Textual description of the fault.
        message: String,
    },
}

impl SendOutcome {
    /// Returns the recipient this outcome belongs to.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::Success { recipient, .. }
            | Self::Failed { recipient, .. }
            | Self::Error { recipient, .. } => recipient,
        }
    }

    /// Returns true for [`SendOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the HTTP status code of a provider rejection, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<http::StatusCode> {
        match self {
            Self::Failed {
                kind: FailureKind::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
