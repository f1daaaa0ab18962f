//! Application execution logic.
//!
//! Loads the job file, assembles the orchestrator from the validated
//! configuration, and drives one dispatch job to completion.

use std::path::PathBuf;

use thiserror::Error;

use bulk_relay::account::HttpAccountService;
use bulk_relay::config::{ConfigError, JobFile, JobRequest, ValidatedConfig};
use bulk_relay::dispatch::BatchDispatcher;
use bulk_relay::notify::WebhookNotifier;
use bulk_relay::orchestrator::{JobError, JobReport, Orchestrator};
use bulk_relay::provider::{
    ClientOptions, HttpError, MediaFile, MediaUploader, MessageSender, ReqwestClient,
    TemplateLookup,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The job file could not be loaded or converted.
    #[error("Failed to load job: {0}")]
    JobFile(#[source] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] HttpError),

    /// The media file referenced by the job could not be read.
    #[error("Failed to read media file '{}': {source}", path.display())]
    MediaRead {
        /// Path of the media file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The job was rejected before dispatch.
    #[error("Job rejected: {0}")]
    Rejected(#[from] JobError),
}

/// The orchestrator type assembled for production runs.
type AppOrchestrator = Orchestrator<
    ReqwestClient,
    HttpAccountService<ReqwestClient>,
    WebhookNotifier<ReqwestClient>,
>;

/// Executes one dispatch job described by the configured job file.
///
/// This function:
/// 1. Loads and converts the job file
/// 2. Builds the shared HTTP client (one pool for the whole job)
/// 3. Assembles dispatcher, template lookup, account service, notifier
/// 4. Runs the orchestrator entry point for the job's kind
///
/// # Errors
///
/// Returns an error if the job file is unusable, the client cannot be
/// built, or the job is rejected before dispatch. Per-recipient send
/// failures are not errors; they are part of the returned report.
pub async fn execute(config: ValidatedConfig) -> Result<JobReport, RunError> {
    let job_file = JobFile::load(&config.job_file).map_err(RunError::JobFile)?;
    let request = prepare_request(job_file)?;

    let client = ReqwestClient::with_options(ClientOptions {
        pool_limit: config.pool_limit,
        timeout: config.send_timeout,
    })
    .map_err(RunError::Client)?;

    let orchestrator = build_orchestrator(&config, &client);

    let report = match request {
        JobRequest::Template(req) => orchestrator.broadcast_template(req).await?,
        JobRequest::Otp(req) => orchestrator.send_otp(req).await?,
        JobRequest::Flow(req) => orchestrator.trigger_flow(req).await?,
        JobRequest::Carousel(req) => orchestrator.broadcast_carousel(req).await?,
        JobRequest::Bot(req) => orchestrator.send_bot_messages(req).await?,
        JobRequest::Probe(req) => orchestrator.validate_numbers(req).await?,
    };

    tracing::info!(
        "Job {} finished: {}/{} sent",
        report.unique_id,
        report.sent(),
        report.results.len(),
    );
    Ok(report)
}

/// Converts the job file into a typed request, attaching media bytes
/// when the job asks for an upload.
fn prepare_request(job_file: JobFile) -> Result<JobRequest, RunError> {
    let media_file = job_file.media_file.clone();
    let content_type = job_file.media_content_type.clone();
    let mut request = job_file.into_request().map_err(RunError::JobFile)?;

    let Some(path) = media_file else {
        return Ok(request);
    };

    let JobRequest::Template(ref mut template) = request else {
        return Err(RunError::JobFile(ConfigError::InvalidValue {
            field: "media_file",
            reason: "only template jobs can upload media".into(),
        }));
    };

    let bytes = std::fs::read(&path).map_err(|e| RunError::MediaRead {
        path: path.clone(),
        source: e,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "media".to_string(), |n| n.to_string_lossy().into_owned());

    template.media_upload = Some(MediaFile {
        file_name,
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        bytes,
    });
    Ok(request)
}

/// Assembles the production orchestrator from validated configuration.
fn build_orchestrator(config: &ValidatedConfig, client: &ReqwestClient) -> AppOrchestrator {
    let sender = MessageSender::new(client.clone(), config.graph_url.clone())
        .with_api_version(config.api_version.clone());
    let dispatcher = BatchDispatcher::new(sender)
        .with_batch_size(config.batch_size)
        .with_pause(config.batch_pause);
    let templates = TemplateLookup::new(client.clone(), config.graph_url.clone());
    let uploader = MediaUploader::new(client.clone(), config.graph_url.clone());
    let accounts = HttpAccountService::new(client.clone(), config.account_url.clone());
    let notifier = WebhookNotifier::new(client.clone(), config.notify_url.clone());

    Orchestrator::new(dispatcher, templates, uploader, accounts, notifier)
}
