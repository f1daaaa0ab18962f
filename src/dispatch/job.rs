//! The immutable description of one bulk-dispatch job.

use thiserror::Error;

use crate::provider::MessageKind;

/// Where a recipient's substitution variables come from.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSource {
    /// Every recipient shares the same template-wide variable list.
    Shared(Vec<String>),
    /// Each recipient has its own variable list, index-aligned with
    /// the job's recipient list.
    PerRecipient(Vec<Vec<String>>),
}

impl VariableSource {
    /// A shared source with no variables at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::Shared(Vec::new())
    }
}

/// Error type for job construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobValidationError {
    /// A per-recipient variable list must pair up with the recipient
    /// at the same position.
    #[error(
        "Per-recipient variables misaligned: {variable_sets} variable sets for {recipients} recipients"
    )]
    MisalignedVariables {
        /// Number of recipients in the job.
        recipients: usize,
        /// Number of per-recipient variable sets supplied.
        variable_sets: usize,
    },
}

/// One inbound bulk-messaging request, immutable for its lifetime.
///
/// The job orchestrator owns the job from creation until the aggregate
/// result is returned; the dispatcher only borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchJob {
    /// Provider bearer token.
    pub token: String,
    /// Target endpoint identifier.
    pub phone_number_id: String,
    /// What to send.
    pub kind: MessageKind,
    /// Ordered recipient list.
    pub recipients: Vec<String>,
    /// Variable source for body substitution.
    pub variables: VariableSource,
    /// Caller-supplied correlation token.
    pub unique_id: String,
    /// Caller- or ledger-supplied report correlation token.
    pub report_id: Option<String>,
}

impl DispatchJob {
    /// Creates a job after checking the variable-alignment invariant.
    ///
    /// # Errors
    ///
    /// Returns [`JobValidationError::MisalignedVariables`] when a
    /// per-recipient variable source does not pair up one-to-one with
    /// the recipient list.
    pub fn new(
        token: impl Into<String>,
        phone_number_id: impl Into<String>,
        kind: MessageKind,
        recipients: Vec<String>,
        variables: VariableSource,
        unique_id: impl Into<String>,
        report_id: Option<String>,
    ) -> Result<Self, JobValidationError> {
        if let VariableSource::PerRecipient(sets) = &variables {
            if sets.len() != recipients.len() {
                return Err(JobValidationError::MisalignedVariables {
                    recipients: recipients.len(),
                    variable_sets: sets.len(),
                });
            }
        }

        Ok(Self {
            token: token.into(),
            phone_number_id: phone_number_id.into(),
            kind,
            recipients,
            variables,
            unique_id: unique_id.into(),
            report_id,
        })
    }
}
