//! Job orchestration: one entry point per message kind.
//!
//! Every entry point shares the same skeleton: normalize the inbound
//! request (flattening CSV-style variable rows into per-recipient
//! overrides), validate the caller's account and credit balance,
//! reserve credits to open a delivery report, dispatch the whole job
//! once, notify completion exactly once, and return the aggregate
//! result. A validation rejection returns before the dispatcher or
//! notifier is ever touched; once dispatch has started the job always
//! proceeds to completion notification.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::account::{
    AccountError, AccountProfile, AccountService, CoinCategory, ReserveRequest, ensure_balance,
};
use crate::dispatch::{
    AggregateResult, BatchDispatcher, DispatchJob, JobValidationError, VariableSource,
};
use crate::notify::CompletionNotifier;
use crate::provider::{
    BotMessage, HttpClient, MediaError, MediaFile, MediaKind, MediaUploader, MessageKind,
    TemplateContext, TemplateError, TemplateLookup,
};
use crate::time::{Sleeper, TokioSleeper};

/// Accepted recipient shape: optional `+`, then 6-15 digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("phone pattern is valid"));

/// Error type for job-level rejections raised before dispatch.
#[derive(Debug, Error)]
pub enum JobError {
    /// Account or credit validation rejected the job.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The job violated a structural invariant.
    #[error(transparent)]
    Invalid(#[from] JobValidationError),

    /// The recipient list is empty.
    #[error("Recipient list is empty")]
    EmptyRecipients,

    /// A recipient is not a plausible phone number.
    #[error("Invalid recipient '{value}'")]
    InvalidRecipient {
        /// The offending raw value.
        value: String,
    },

    /// A CSV variable row carried no contact column.
    #[error("CSV variable row {index} is empty")]
    EmptyCsvRow {
        /// Zero-based row index.
        index: usize,
    },

    /// OTP jobs need the code to fill the copy-code button.
    #[error("OTP jobs require the code as the first variable")]
    MissingOtpCode,

    /// Carousel template lookup failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Media upload failed before dispatch.
    #[error(transparent)]
    Media(#[from] MediaError),
}

impl JobError {
    /// The HTTP status the inbound surface reports for this rejection.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Account(e) => e.status_code(),
            Self::Template(TemplateError::NotFound { .. }) => 404,
            Self::Template(TemplateError::Rejected { status, .. })
            | Self::Media(MediaError::Rejected { status, .. }) => status.as_u16(),
            Self::Template(_) | Self::Media(_) => 500,
            _ => 400,
        }
    }
}

/// Template broadcast request, optionally carrying CSV variable rows.
#[derive(Debug, Clone)]
pub struct TemplateBroadcastRequest {
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// Template name.
    pub template_name: String,
    /// Language code.
    pub language: String,
    /// Header media kind.
    pub media: MediaKind,
    /// Uploaded media id for the header.
    pub media_id: Option<String>,
    /// Media file to upload before dispatch; its id replaces
    /// `media_id`.
    pub media_upload: Option<MediaFile>,
    /// Recipient phone numbers.
    pub contacts: Vec<String>,
    /// Template-wide variable list shared by all recipients.
    pub variables: Vec<String>,
    /// CSV-style rows: `[contact, var1, var2, ...]`. When present,
    /// each row replaces the recipient and variables at its index.
    pub csv_variables: Option<Vec<Vec<String>>>,
    /// Caller-supplied correlation token.
    pub unique_id: String,
}

/// OTP broadcast request. The code is the first variable.
#[derive(Debug, Clone)]
pub struct OtpBroadcastRequest {
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// Template name.
    pub template_name: String,
    /// Language code.
    pub language: String,
    /// Recipient phone numbers.
    pub contacts: Vec<String>,
    /// Shared variable list; the first entry is the OTP code.
    pub variables: Vec<String>,
    /// CSV-style rows, same semantics as template broadcasts.
    pub csv_variables: Option<Vec<Vec<String>>>,
    /// Caller-supplied correlation token.
    pub unique_id: String,
}

/// Flow trigger request.
#[derive(Debug, Clone)]
pub struct FlowTriggerRequest {
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// Template name.
    pub template_name: String,
    /// Language code.
    pub language: String,
    /// Flow id delivered as the button payload.
    pub flow_id: String,
    /// Recipient phone numbers.
    pub contacts: Vec<String>,
    /// Caller-supplied correlation token.
    pub unique_id: String,
}

/// Carousel broadcast request. The template's registered language is
/// resolved via template lookup before dispatch.
#[derive(Debug, Clone)]
pub struct CarouselBroadcastRequest {
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// Template name.
    pub template_name: String,
    /// Uploaded media ids, one carousel card each.
    pub media_ids: Vec<String>,
    /// Recipient phone numbers.
    pub contacts: Vec<String>,
    /// Caller-supplied correlation token.
    pub unique_id: String,
}

/// Interactive ("bot") broadcast request.
#[derive(Debug, Clone)]
pub struct BotBroadcastRequest {
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// The interactive message to send.
    pub message: BotMessage,
    /// Recipient phone numbers.
    pub contacts: Vec<String>,
    /// Caller-supplied correlation token.
    pub unique_id: String,
}

/// Number validation request: sends a plain text probe per recipient.
#[derive(Debug, Clone)]
pub struct NumberValidationRequest {
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// Probe message body.
    pub message_text: String,
    /// Recipient phone numbers.
    pub contacts: Vec<String>,
    /// Caller-supplied correlation token.
    pub unique_id: String,
}

/// The returned summary of one completed job.
#[derive(Debug, Clone)]
pub struct JobReport {
    /// The job's correlation token.
    pub unique_id: String,
    /// The delivery report opened by the credit reservation.
    pub report_id: Option<String>,
    /// Per-recipient outcomes, submission order.
    pub results: AggregateResult,
}

impl JobReport {
    /// Number of successful sends.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.results.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed or errored sends.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.sent()
    }
}

/// Drives one job per inbound request: validate, dispatch, notify.
///
/// # Type Parameters
///
/// - `C`: HTTP client shared by the dispatcher and template lookup
/// - `A`: account service collaborator
/// - `N`: completion notifier
/// - `S`: sleeper for inter-batch pacing
#[derive(Debug)]
pub struct Orchestrator<C, A, N, S = TokioSleeper> {
    dispatcher: BatchDispatcher<C, S>,
    templates: TemplateLookup<C>,
    media: MediaUploader<C>,
    accounts: A,
    notifier: N,
}

impl<C, A, N, S> Orchestrator<C, A, N, S> {
    /// Assembles an orchestrator from its collaborators.
    #[must_use]
    pub const fn new(
        dispatcher: BatchDispatcher<C, S>,
        templates: TemplateLookup<C>,
        media: MediaUploader<C>,
        accounts: A,
        notifier: N,
    ) -> Self {
        Self {
            dispatcher,
            templates,
            media,
            accounts,
            notifier,
        }
    }
}

impl<C, A, N, S> Orchestrator<C, A, N, S>
where
    C: HttpClient + Clone + Send + Sync + 'static,
    A: AccountService,
    N: CompletionNotifier,
    S: Sleeper,
{
    /// Broadcasts a template message to every contact.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] if normalization or account validation
    /// rejects the job; the dispatcher and notifier are not touched.
    pub async fn broadcast_template(
        &self,
        request: TemplateBroadcastRequest,
    ) -> Result<JobReport, JobError> {
        let (contacts, variables) =
            flatten_variables(request.contacts, request.variables, request.csv_variables)?;
        let profile = self
            .accounts
            .lookup(&request.user_id, &request.api_token)
            .await?;
        ensure_balance(&profile, CoinCategory::Marketing, contacts.len() as u64)?;

        // Upload before reserving credits; a failed upload must not
        // debit the account.
        let media_id = match request.media_upload {
            Some(file) => Some(
                self.media
                    .upload(&profile.token, &profile.phone_number_id, &file)
                    .await?,
            ),
            None => request.media_id,
        };

        let report_id = self
            .accounts
            .reserve(ReserveRequest {
                user_id: &request.user_id,
                api_token: &request.api_token,
                coins: contacts.len() as u64,
                recipients: &contacts,
                template_name: &request.template_name,
                category: CoinCategory::Marketing,
            })
            .await?;

        let kind = MessageKind::Template(TemplateContext {
            name: request.template_name,
            language: request.language,
            media: request.media,
            media_id,
        });
        let job = DispatchJob::new(
            profile.token,
            profile.phone_number_id,
            kind,
            contacts,
            variables,
            request.unique_id,
            Some(report_id),
        )?;
        Ok(self.run(job).await)
    }

    /// Broadcasts an OTP template to every contact.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::MissingOtpCode`] when no variable carries
    /// the code, and any rejection [`Self::broadcast_template`] can
    /// produce.
    pub async fn send_otp(&self, request: OtpBroadcastRequest) -> Result<JobReport, JobError> {
        let (contacts, variables) =
            flatten_variables(request.contacts, request.variables, request.csv_variables)?;
        if !has_first_variable(&variables) {
            return Err(JobError::MissingOtpCode);
        }
        let (profile, report_id) = self
            .clear_account(
                &request.user_id,
                &request.api_token,
                &contacts,
                &request.template_name,
                CoinCategory::Authentication,
            )
            .await?;

        // OTP headers are always plain text.
        let kind = MessageKind::Otp(TemplateContext {
            name: request.template_name,
            language: request.language,
            media: MediaKind::Text,
            media_id: None,
        });
        let job = DispatchJob::new(
            profile.token,
            profile.phone_number_id,
            kind,
            contacts,
            variables,
            request.unique_id,
            Some(report_id),
        )?;
        Ok(self.run(job).await)
    }

    /// Triggers a flow for every contact via a flow-button template.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] if normalization or account validation
    /// rejects the job.
    pub async fn trigger_flow(&self, request: FlowTriggerRequest) -> Result<JobReport, JobError> {
        let contacts = normalize_contacts(request.contacts)?;
        let (profile, report_id) = self
            .clear_account(
                &request.user_id,
                &request.api_token,
                &contacts,
                &request.template_name,
                CoinCategory::Marketing,
            )
            .await?;

        let kind = MessageKind::Flow {
            template: request.template_name,
            language: request.language,
            flow_id: request.flow_id,
        };
        let job = DispatchJob::new(
            profile.token,
            profile.phone_number_id,
            kind,
            contacts,
            VariableSource::none(),
            request.unique_id,
            Some(report_id),
        )?;
        Ok(self.run(job).await)
    }

    /// Broadcasts a carousel, one card per uploaded media id.
    ///
    /// The template's registered language is resolved through the
    /// provider's template listing before dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Template`] when the template cannot be
    /// resolved, plus any validation rejection.
    pub async fn broadcast_carousel(
        &self,
        request: CarouselBroadcastRequest,
    ) -> Result<JobReport, JobError> {
        let contacts = normalize_contacts(request.contacts)?;
        let profile = self
            .accounts
            .lookup(&request.user_id, &request.api_token)
            .await?;
        ensure_balance(&profile, CoinCategory::Marketing, contacts.len() as u64)?;

        // Resolve the template before reserving credits; an unknown
        // template must not debit the account.
        let details = self
            .templates
            .fetch(&profile.token, &profile.waba_id, &request.template_name)
            .await?;

        let report_id = self
            .accounts
            .reserve(ReserveRequest {
                user_id: &request.user_id,
                api_token: &request.api_token,
                coins: contacts.len() as u64,
                recipients: &contacts,
                template_name: &request.template_name,
                category: CoinCategory::Marketing,
            })
            .await?;

        let kind = MessageKind::Carousel {
            template: details.name,
            language: details.language,
            media_ids: request.media_ids,
        };
        let job = DispatchJob::new(
            profile.token,
            profile.phone_number_id,
            kind,
            contacts,
            VariableSource::none(),
            request.unique_id,
            Some(report_id),
        )?;
        Ok(self.run(job).await)
    }

    /// Broadcasts an interactive ("bot") message to every contact.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] if normalization or account validation
    /// rejects the job.
    pub async fn send_bot_messages(
        &self,
        request: BotBroadcastRequest,
    ) -> Result<JobReport, JobError> {
        let contacts = normalize_contacts(request.contacts)?;
        let (profile, report_id) = self
            .clear_account(
                &request.user_id,
                &request.api_token,
                &contacts,
                "bot",
                CoinCategory::Marketing,
            )
            .await?;

        let job = DispatchJob::new(
            profile.token,
            profile.phone_number_id,
            MessageKind::Bot(request.message),
            contacts,
            VariableSource::none(),
            request.unique_id,
            Some(report_id),
        )?;
        Ok(self.run(job).await)
    }

    /// Probes every contact with a plain text message to find
    /// reachable numbers.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] if normalization or account validation
    /// rejects the job.
    pub async fn validate_numbers(
        &self,
        request: NumberValidationRequest,
    ) -> Result<JobReport, JobError> {
        let contacts = normalize_contacts(request.contacts)?;
        let (profile, report_id) = self
            .clear_account(
                &request.user_id,
                &request.api_token,
                &contacts,
                "probe",
                CoinCategory::Utility,
            )
            .await?;

        let job = DispatchJob::new(
            profile.token,
            profile.phone_number_id,
            MessageKind::Probe {
                text: request.message_text,
            },
            contacts,
            VariableSource::none(),
            request.unique_id,
            Some(report_id),
        )?;
        Ok(self.run(job).await)
    }

    /// Validates the account, checks the balance, and reserves one
    /// credit per contact. Any rejection aborts the job before
    /// dispatch.
    async fn clear_account(
        &self,
        user_id: &str,
        api_token: &str,
        contacts: &[String],
        template_name: &str,
        category: CoinCategory,
    ) -> Result<(AccountProfile, String), JobError> {
        let profile = self.accounts.lookup(user_id, api_token).await?;
        let required = contacts.len() as u64;
        ensure_balance(&profile, category, required)?;

        let report_id = self
            .accounts
            .reserve(ReserveRequest {
                user_id,
                api_token,
                coins: required,
                recipients: contacts,
                template_name,
                category,
            })
            .await?;

        Ok((profile, report_id))
    }

    /// The dispatch-and-notify tail shared by every entry point.
    async fn run(&self, job: DispatchJob) -> JobReport {
        let results = self.dispatcher.dispatch(&job).await;
        self.notifier
            .notify(&results, &job.unique_id, job.report_id.as_deref())
            .await;

        let report = JobReport {
            unique_id: job.unique_id,
            report_id: job.report_id,
            results,
        };
        tracing::info!(
            "Job {} completed: {} sent, {} failed",
            report.unique_id,
            report.sent(),
            report.failed(),
        );
        report
    }
}

/// Trims and checks one recipient phone number.
fn normalize_recipient(raw: &str) -> Result<String, JobError> {
    let trimmed = raw.trim();
    if PHONE_PATTERN.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(JobError::InvalidRecipient {
            value: raw.to_string(),
        })
    }
}

/// Normalizes a non-empty contact list.
fn normalize_contacts(contacts: Vec<String>) -> Result<Vec<String>, JobError> {
    if contacts.is_empty() {
        return Err(JobError::EmptyRecipients);
    }
    contacts.iter().map(|c| normalize_recipient(c)).collect()
}

/// Resolves the contact list and variable source for template-family
/// jobs.
///
/// When CSV rows are present each row replaces the recipient and
/// variables at its index: column 0 is the contact, the rest are that
/// recipient's variables. Rows must pair up one-to-one with the
/// contact list. Without CSV rows every recipient shares `variables`.
fn flatten_variables(
    contacts: Vec<String>,
    variables: Vec<String>,
    csv_variables: Option<Vec<Vec<String>>>,
) -> Result<(Vec<String>, VariableSource), JobError> {
    let Some(rows) = csv_variables else {
        return Ok((normalize_contacts(contacts)?, VariableSource::Shared(variables)));
    };

    if rows.len() != contacts.len() {
        return Err(JobValidationError::MisalignedVariables {
            recipients: contacts.len(),
            variable_sets: rows.len(),
        }
        .into());
    }
    if rows.is_empty() {
        return Err(JobError::EmptyRecipients);
    }

    let mut recipients = Vec::with_capacity(rows.len());
    let mut overrides = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let mut columns = row.into_iter();
        let contact = columns.next().ok_or(JobError::EmptyCsvRow { index })?;
        recipients.push(normalize_recipient(&contact)?);
        overrides.push(columns.collect());
    }

    Ok((recipients, VariableSource::PerRecipient(overrides)))
}

/// True if every recipient will have a first variable available.
fn has_first_variable(variables: &VariableSource) -> bool {
    match variables {
        VariableSource::Shared(vars) => !vars.is_empty(),
        VariableSource::PerRecipient(sets) => sets.iter().all(|set| !set.is_empty()),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
