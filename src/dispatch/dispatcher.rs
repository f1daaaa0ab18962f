//! Concurrent batch dispatch of a job's recipient list.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::provider::{HttpClient, MessageSender, SendOutcome};
use crate::time::{Sleeper, TokioSleeper};

use super::batch::{Batch, batch_count, batches};
use super::job::{DispatchJob, VariableSource};
use super::AggregateResult;

/// Default batch width, chosen to stay under the provider's per-call
/// rate ceiling.
pub const DEFAULT_BATCH_SIZE: usize = 78;

/// Default pause between consecutive batches.
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(200);

/// Partitions a job's recipients into fixed-size batches, runs each
/// batch fully concurrently, pauses between batches, and accumulates
/// every per-recipient outcome in submission order.
///
/// One send's failure never cancels or affects sibling sends: failures
/// are absorbed into [`SendOutcome`]s by the sender, and a task that
/// dies outside that path (panic, cancellation) is recorded as a
/// `status=error` outcome at the join point. Memory and concurrency
/// pressure are bounded by one batch width regardless of list length.
///
/// # Type Parameters
///
/// - `C`: the HTTP client implementation, shared across all sends
/// - `S`: the sleeper used for inter-batch pacing (defaults to
///   [`TokioSleeper`])
#[derive(Debug)]
pub struct BatchDispatcher<C, S = TokioSleeper> {
    sender: MessageSender<C>,
    sleeper: S,
    batch_size: usize,
    pause: Duration,
}

impl<C> BatchDispatcher<C, TokioSleeper> {
    /// Creates a dispatcher with the default batch width and pause.
    #[must_use]
    pub fn new(sender: MessageSender<C>) -> Self {
        Self {
            sender,
            sleeper: TokioSleeper,
            batch_size: DEFAULT_BATCH_SIZE,
            pause: DEFAULT_BATCH_PAUSE,
        }
    }
}

impl<C, S> BatchDispatcher<C, S> {
    /// Sets a custom sleeper for inter-batch pacing.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> BatchDispatcher<C, S2> {
        BatchDispatcher {
            sender: self.sender,
            sleeper,
            batch_size: self.batch_size,
            pause: self.pause,
        }
    }

    /// Sets the maximum number of recipients per batch.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        self.batch_size = batch_size;
        self
    }

    /// Sets the fixed pause inserted between consecutive batches.
    ///
    /// The interval is constant regardless of batch outcomes; there is
    /// deliberately no adaptive backoff.
    #[must_use]
    pub const fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Returns the configured batch width.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the configured inter-batch pause.
    #[must_use]
    pub const fn pause(&self) -> Duration {
        self.pause
    }
}

/// Per-job send context shared across a batch's spawned tasks.
struct SendContext<C> {
    sender: MessageSender<C>,
    token: String,
    phone_number_id: String,
    kind: crate::provider::MessageKind,
    shared_variables: Vec<String>,
}

impl<C, S> BatchDispatcher<C, S>
where
    C: HttpClient + Clone + Send + Sync + 'static,
    S: Sleeper,
{
    /// Dispatches the whole job and returns the aggregate result.
    ///
    /// Batches execute strictly sequentially; sends within a batch run
    /// concurrently against each other. The returned sequence contains
    /// exactly one outcome per recipient, in the recipient list's
    /// original order.
    pub async fn dispatch(&self, job: &DispatchJob) -> AggregateResult {
        let total = job.recipients.len();
        tracing::info!(
            "Processing {total} contacts for {} job {}",
            job.kind.name(),
            job.unique_id,
        );

        let (shared_variables, overrides) = match &job.variables {
            VariableSource::Shared(vars) => (vars.clone(), None),
            VariableSource::PerRecipient(sets) => (Vec::new(), Some(sets.as_slice())),
        };

        let context = Arc::new(SendContext {
            sender: self.sender.clone(),
            token: job.token.clone(),
            phone_number_id: job.phone_number_id.clone(),
            kind: job.kind.clone(),
            shared_variables,
        });

        let total_batches = batch_count(total, self.batch_size);
        let mut results = Vec::with_capacity(total);

        for batch in batches(&job.recipients, overrides, self.batch_size) {
            tracing::info!("Sending batch of {} contacts", batch.recipients.len());
            self.run_batch(&context, batch, &mut results).await;

            // Rate limiting between waves; nothing to pace after the last.
            if batch.index + 1 < total_batches {
                self.sleeper.sleep(self.pause).await;
            }
        }

        tracing::info!("All messages processed. Total results: {}", results.len());
        results
    }

    /// Runs one batch's sends concurrently and appends their outcomes
    /// in issuance order.
    async fn run_batch(
        &self,
        context: &Arc<SendContext<C>>,
        batch: Batch<'_>,
        results: &mut AggregateResult,
    ) {
        let mut in_flight = Vec::with_capacity(batch.recipients.len());
        let mut handles = Vec::with_capacity(batch.recipients.len());

        for (offset, recipient) in batch.recipients.iter().enumerate() {
            let context = Arc::clone(context);
            let recipient = recipient.clone();
            let override_set = batch
                .overrides
                .and_then(|sets| sets.get(offset))
                .cloned();

            in_flight.push(recipient.clone());
            handles.push(tokio::spawn(async move {
                // Per-recipient override takes priority over the
                // job-wide shared list.
                let variables = override_set
                    .as_deref()
                    .unwrap_or(&context.shared_variables);
                context
                    .sender
                    .send(
                        &context.token,
                        &context.phone_number_id,
                        &context.kind,
                        &recipient,
                        variables,
                    )
                    .await
            }));
        }

        for (recipient, joined) in in_flight.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(outcome) => results.push(outcome),
                Err(e) => {
                    tracing::error!("Error during batch processing: {e}");
                    results.push(SendOutcome::Error {
                        recipient,
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}
