//! The bulk dispatch engine.
//!
//! Takes an arbitrarily large recipient list and a message kind,
//! partitions it into provider-safe batches ([`batches`]), fires each
//! batch's per-recipient sends concurrently, pauses between batches to
//! respect provider rate limits, and collects per-recipient outcomes
//! without letting one failure abort the batch ([`BatchDispatcher`]).
//!
//! Ordering guarantees: within a batch no completion order is
//! guaranteed, but the aggregate result always preserves submission
//! order (batch order, then per-batch issuance order). Batch N's sends
//! are fully resolved before batch N+1 begins.

mod batch;
mod dispatcher;
mod job;


pub use batch::{Batch, batch_count, batches};
pub use dispatcher::{BatchDispatcher, DEFAULT_BATCH_PAUSE, DEFAULT_BATCH_SIZE};
pub use job::{DispatchJob, JobValidationError, VariableSource};

/// The full ordered sequence of per-recipient outcomes for one job.
pub type AggregateResult = Vec<crate::provider::SendOutcome>;
