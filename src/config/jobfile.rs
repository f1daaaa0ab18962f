//! Job file parsing.
//!
//! A job file is one TOML document describing a single bulk-messaging
//! request: the kind, caller credentials, recipients, and the
//! kind-specific fields. [`JobFile::into_request`] converts the parsed
//! document into the orchestrator's typed request for that kind.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::orchestrator::{
    BotBroadcastRequest, CarouselBroadcastRequest, FlowTriggerRequest, NumberValidationRequest,
    OtpBroadcastRequest, TemplateBroadcastRequest,
};
use crate::provider::{BotMessage, MediaKind};

use super::ConfigError;

/// Message kind selector in a job file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Template broadcast.
    Template,
    /// OTP broadcast.
    Otp,
    /// Flow trigger.
    Flow,
    /// Carousel broadcast.
    Carousel,
    /// Interactive ("bot") broadcast.
    Bot,
    /// Number validation probe.
    Probe,
}

/// Interactive message description in a job file.
///
/// Mirrors [`BotMessage`] with wire-friendly snake_case tags;
/// `sections` and `buttons` are passed through as JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotSection {
    /// Plain text message.
    Text {
        /// Message body.
        body: String,
    },
    /// Image by media id.
    Image {
        /// Uploaded media id.
        media_id: String,
        /// Optional caption.
        caption: Option<String>,
    },
    /// Document by media id.
    Document {
        /// Uploaded media id.
        media_id: String,
        /// Optional caption.
        caption: Option<String>,
        /// Display filename.
        filename: Option<String>,
    },
    /// Video by media id.
    Video {
        /// Uploaded media id.
        media_id: String,
        /// Optional caption.
        caption: Option<String>,
    },
    /// Interactive list message.
    List {
        /// Optional text header.
        header: Option<String>,
        /// Message body.
        body: String,
        /// Optional footer.
        footer: Option<String>,
        /// Provider-shaped section array.
        sections: serde_json::Value,
    },
    /// Interactive reply-button message.
    ReplyButtons {
        /// Message body.
        body: String,
        /// Optional footer.
        footer: Option<String>,
        /// Provider-shaped button array.
        buttons: serde_json::Value,
    },
    /// Single-product message.
    Product {
        /// Message body.
        body: String,
        /// Optional footer.
        footer: Option<String>,
        /// Catalog id.
        catalog_id: String,
        /// Retailer id of the product.
        product_retailer_id: String,
    },
    /// Multi-product message.
    ProductList {
        /// Optional text header.
        header: Option<String>,
        /// Message body.
        body: String,
        /// Optional footer.
        footer: Option<String>,
        /// Catalog id.
        catalog_id: String,
        /// Provider-shaped section array.
        sections: serde_json::Value,
    },
    /// Static location pin.
    Location {
        /// Latitude in decimal degrees.
        latitude: f64,
        /// Longitude in decimal degrees.
        longitude: f64,
        /// Optional location name.
        name: Option<String>,
        /// Optional address line.
        address: Option<String>,
    },
    /// Location request.
    LocationRequest {
        /// Message body.
        body: String,
    },
}

impl From<BotSection> for BotMessage {
    fn from(section: BotSection) -> Self {
        match section {
            BotSection::Text { body } => Self::Text { body },
            BotSection::Image { media_id, caption } => Self::Image { media_id, caption },
            BotSection::Document {
                media_id,
                caption,
                filename,
            } => Self::Document {
                media_id,
                caption,
                filename,
            },
            BotSection::Video { media_id, caption } => Self::Video { media_id, caption },
            BotSection::List {
                header,
                body,
                footer,
                sections,
            } => Self::List {
                header,
                body,
                footer,
                sections,
            },
            BotSection::ReplyButtons {
                body,
                footer,
                buttons,
            } => Self::ReplyButtons {
                body,
                footer,
                buttons,
            },
            BotSection::Product {
                body,
                footer,
                catalog_id,
                product_retailer_id,
            } => Self::Product {
                body,
                footer,
                catalog_id,
                product_retailer_id,
            },
            BotSection::ProductList {
                header,
                body,
                footer,
                catalog_id,
                sections,
            } => Self::ProductList {
                header,
                body,
                footer,
                catalog_id,
                sections,
            },
            BotSection::Location {
                latitude,
                longitude,
                name,
                address,
            } => Self::Location {
                latitude,
                longitude,
                name,
                address,
            },
            BotSection::LocationRequest { body } => Self::LocationRequest { body },
        }
    }
}

/// One parsed job file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Which kind of job to dispatch.
    pub kind: JobKind,
    /// Caller account id.
    pub user_id: String,
    /// Caller API token.
    pub api_token: String,
    /// Caller-supplied correlation token.
    pub unique_id: String,

    /// Recipient phone numbers.
    #[serde(default)]
    pub contacts: Vec<String>,
    /// Shared variable list.
    #[serde(default)]
    pub variables: Vec<String>,
    /// CSV-style rows: `[contact, var1, var2, ...]`.
    pub csv_variables: Option<Vec<Vec<String>>>,

    /// Template name (template/otp/flow/carousel kinds).
    pub template_name: Option<String>,
    /// Language code (template/otp/flow kinds).
    pub language: Option<String>,
    /// Header media kind, e.g. `IMAGE` (template kind).
    pub media_type: Option<String>,
    /// Uploaded media id for the header (template kind).
    pub media_id: Option<String>,
    /// Local file to upload before dispatch, replacing `media_id`.
    pub media_file: Option<PathBuf>,
    /// MIME type of `media_file`.
    pub media_content_type: Option<String>,

    /// Flow id (flow kind).
    pub flow_id: Option<String>,
    /// Uploaded media ids, one card each (carousel kind).
    #[serde(default)]
    pub media_ids: Vec<String>,
    /// Probe message body (probe kind).
    pub message_text: Option<String>,
    /// Interactive message description (bot kind).
    pub bot: Option<BotSection>,
}

/// A typed request for exactly one orchestrator entry point.
#[derive(Debug, Clone)]
pub enum JobRequest {
    /// Template broadcast.
    Template(TemplateBroadcastRequest),
    /// OTP broadcast.
    Otp(OtpBroadcastRequest),
    /// Flow trigger.
    Flow(FlowTriggerRequest),
    /// Carousel broadcast.
    Carousel(CarouselBroadcastRequest),
    /// Interactive broadcast.
    Bot(BotBroadcastRequest),
    /// Number validation probe.
    Probe(NumberValidationRequest),
}

impl JobFile {
    /// Loads a job file from a TOML document on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses a job file from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Converts the parsed file into the typed request for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] when a kind-specific
    /// field is absent and [`ConfigError::InvalidValue`] for unknown
    /// media types.
    pub fn into_request(self) -> Result<JobRequest, ConfigError> {
        match self.kind {
            JobKind::Template => {
                let media = parse_media_kind(self.media_type.as_deref())?;
                Ok(JobRequest::Template(TemplateBroadcastRequest {
                    user_id: self.user_id,
                    api_token: self.api_token,
                    template_name: require(self.template_name, "template_name")?,
                    language: require(self.language, "language")?,
                    media,
                    media_id: self.media_id,
                    media_upload: None,
                    contacts: self.contacts,
                    variables: self.variables,
                    csv_variables: self.csv_variables,
                    unique_id: self.unique_id,
                }))
            }
            JobKind::Otp => Ok(JobRequest::Otp(OtpBroadcastRequest {
                user_id: self.user_id,
                api_token: self.api_token,
                template_name: require(self.template_name, "template_name")?,
                language: require(self.language, "language")?,
                contacts: self.contacts,
                variables: self.variables,
                csv_variables: self.csv_variables,
                unique_id: self.unique_id,
            })),
            JobKind::Flow => Ok(JobRequest::Flow(FlowTriggerRequest {
                user_id: self.user_id,
                api_token: self.api_token,
                template_name: require(self.template_name, "template_name")?,
                language: require(self.language, "language")?,
                flow_id: require(self.flow_id, "flow_id")?,
                contacts: self.contacts,
                unique_id: self.unique_id,
            })),
            JobKind::Carousel => Ok(JobRequest::Carousel(CarouselBroadcastRequest {
                user_id: self.user_id,
                api_token: self.api_token,
                template_name: require(self.template_name, "template_name")?,
                media_ids: self.media_ids,
                contacts: self.contacts,
                unique_id: self.unique_id,
            })),
            JobKind::Bot => {
                let bot = self.bot.ok_or(ConfigError::missing(
                    "bot",
                    "Add a [bot] table describing the interactive message",
                ))?;
                Ok(JobRequest::Bot(BotBroadcastRequest {
                    user_id: self.user_id,
                    api_token: self.api_token,
                    message: bot.into(),
                    contacts: self.contacts,
                    unique_id: self.unique_id,
                }))
            }
            JobKind::Probe => Ok(JobRequest::Probe(NumberValidationRequest {
                user_id: self.user_id,
                api_token: self.api_token,
                message_text: require(self.message_text, "message_text")?,
                contacts: self.contacts,
                unique_id: self.unique_id,
            })),
        }
    }
}

fn require(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::MissingRequired {
        field,
        hint: "This field is required for the selected job kind",
    })
}

/// Parses a wire media-type name into a [`MediaKind`].
///
/// Absence means a plain text header.
fn parse_media_kind(raw: Option<&str>) -> Result<MediaKind, ConfigError> {
    let Some(raw) = raw else {
        return Ok(MediaKind::Text);
    };
    match raw.to_ascii_uppercase().as_str() {
        "TEXT" => Ok(MediaKind::Text),
        "IMAGE" => Ok(MediaKind::Image),
        "DOCUMENT" => Ok(MediaKind::Document),
        "VIDEO" => Ok(MediaKind::Video),
        "AUDIO" => Ok(MediaKind::Audio),
        other => Err(ConfigError::invalid(
            "media_type",
            format!("unknown media type '{other}'"),
        )),
    }
}
