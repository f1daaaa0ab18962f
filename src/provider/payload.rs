//! Provider request body construction.
//!
//! Pure functions mapping (message kind, recipient, variables) to the
//! JSON body the provider's `/messages` endpoint expects. No state,
//! no I/O; every kind is a variant of [`MessageKind`] and
//! [`build_payload`] is total over it.

use serde_json::{Value, json};

/// Media kind carried in a template's header component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    /// No media header; body text only.
    #[default]
    Text,
    /// Image header, referenced by uploaded media id.
    Image,
    /// Document header, referenced by uploaded media id.
    Document,
    /// Video header, referenced by uploaded media id.
    Video,
    /// Audio header, referenced by uploaded media id.
    Audio,
}

impl MediaKind {
    /// Lowercase name used as the header parameter type key.
    #[must_use]
    pub const fn param_key(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Document => "document",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Uppercase name used in the context tag, matching the wire
    /// convention callers submit.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Document => "DOCUMENT",
            Self::Video => "VIDEO",
            Self::Audio => "AUDIO",
        }
    }

    /// True if this kind references uploaded media.
    #[must_use]
    pub const fn has_media(self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// Template identity plus optional header media for template sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// Template name registered with the provider.
    pub name: String,
    /// Language code, e.g. `en_US`.
    pub language: String,
    /// Header media kind.
    pub media: MediaKind,
    /// Uploaded media id for the header, when `media` requires one.
    pub media_id: Option<String>,
}

/// One interactive ("bot") message shape.
///
/// `sections` and `buttons` are passed through verbatim as JSON, the
/// same way the inbound surface supplies them.
#[derive(Debug, Clone, PartialEq)]
pub enum BotMessage {
    /// Plain text message.
    Text {
        /// Message body.
        body: String,
    },
    /// Image by media id with optional caption.
    Image {
        /// Uploaded media id.
        media_id: String,
        /// Optional caption.
        caption: Option<String>,
    },
    /// Document by media id with optional caption and filename.
    Document {
        /// Uploaded media id.
        media_id: String,
        /// Optional caption.
        caption: Option<String>,
        /// Display filename; defaults to `document`.
        filename: Option<String>,
    },
    /// Video by media id with optional caption.
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
        /// Provider-shaped section array, passed through.
        sections: Value,
    },
    /// Interactive reply-button message.
    ReplyButtons {
        /// Message body.
        body: String,
        /// Optional footer.
        footer: Option<String>,
        /// Provider-shaped button array, passed through.
        buttons: Value,
    },
    /// Single-product message from a catalog.
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
    /// Multi-product message from a catalog.
    ProductList {
        /// Optional text header.
        header: Option<String>,
        /// Message body.
        body: String,
        /// Optional footer.
        footer: Option<String>,
        /// Catalog id.
        catalog_id: String,
        /// Provider-shaped section array, passed through.
        sections: Value,
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
    /// Request asking the recipient to share their location.
    LocationRequest {
        /// Message body.
        body: String,
    },
}

/// Every message shape the relay can send, as a tagged variant.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// Template broadcast with optional media header and body variables.
    Template(TemplateContext),
    /// OTP template: body variables plus a copy-code URL button whose
    /// text is the first variable.
    Otp(TemplateContext),
    /// Template carrying a flow-trigger button.
    Flow {
        /// Template name.
        template: String,
        /// Language code.
        language: String,
        /// Flow id delivered as the button payload.
        flow_id: String,
    },
    /// Carousel template, one card per uploaded media id.
    Carousel {
        /// Template name.
        template: String,
        /// Language code.
        language: String,
        /// Uploaded media ids, one card each.
        media_ids: Vec<String>,
    },
    /// Interactive ("bot") message.
    Bot(BotMessage),
    /// Plain text probe used for number validation.
    Probe {
        /// Probe message body.
        text: String,
    },
}

impl MessageKind {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Otp(_) => "otp",
            Self::Flow { .. } => "flow",
            Self::Carousel { .. } => "carousel",
            Self::Bot(_) => "bot",
            Self::Probe { .. } => "probe",
        }
    }
}

/// Builds the provider request body for one recipient.
///
/// `variables` is the recipient's effective substitution set, already
/// resolved by the dispatcher (per-recipient override or the job-wide
/// shared list).
#[must_use]
pub fn build_payload(kind: &MessageKind, recipient: &str, variables: &[String]) -> Value {
    match kind {
        MessageKind::Template(ctx) => template_payload(ctx, recipient, variables, false),
        MessageKind::Otp(ctx) => template_payload(ctx, recipient, variables, true),
        MessageKind::Flow {
            template,
            language,
            flow_id,
        } => flow_payload(template, language, flow_id, recipient),
        MessageKind::Carousel {
            template,
            language,
            media_ids,
        } => carousel_payload(template, language, media_ids, recipient),
        MessageKind::Bot(message) => bot_payload(message, recipient),
        MessageKind::Probe { text } => json!({
            "messaging_product": "whatsapp",
            "to": recipient,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": text,
            },
        }),
    }
}

fn body_parameters(variables: &[String]) -> Vec<Value> {
    variables
        .iter()
        .map(|variable| json!({"type": "text", "text": variable}))
        .collect()
}

fn template_payload(
    ctx: &TemplateContext,
    recipient: &str,
    variables: &[String],
    otp_button: bool,
) -> Value {
    let mut header_parameters = Vec::new();
    if let Some(media_id) = &ctx.media_id {
        if ctx.media.has_media() {
            let key = ctx.media.param_key();
            header_parameters.push(json!({"type": key, key: {"id": media_id}}));
        }
    }

    let mut components = vec![
        json!({"type": "header", "parameters": header_parameters}),
        json!({"type": "body", "parameters": body_parameters(variables)}),
    ];

    if otp_button {
        // The copy-code button carries the OTP itself: the first body
        // variable, mirrored into the button parameter.
        let code = variables.first().map_or("", String::as_str);
        components.push(json!({
            "type": "button",
            "sub_type": "url",
            "index": "0",
            "parameters": [{"type": "text", "text": code}],
        }));
    }

    // Correlation tag echoed back by the provider in status callbacks.
    let context_info = json!({
        "template_name": ctx.name,
        "language": ctx.language,
        "media_type": ctx.media.wire_name(),
    })
    .to_string();

    json!({
        "messaging_product": "whatsapp",
        "to": recipient,
        "type": "template",
        "template": {
            "name": ctx.name,
            "language": {"code": ctx.language},
            "components": components,
        },
        "context": {
            "message_id": format!("template_{}_{}", ctx.name, context_info),
        },
    })
}

fn flow_payload(template: &str, language: &str, flow_id: &str, recipient: &str) -> Value {
    json!({
        "messaging_product": "whatsapp",
        "to": recipient,
        "type": "template",
        "template": {
            "name": template,
            "language": {"code": language},
            "components": [{
                "type": "button",
                "sub_type": "flow",
                "index": "0",
                "parameters": [{"type": "payload", "payload": flow_id}],
            }],
        },
    })
}

fn carousel_payload(template: &str, language: &str, media_ids: &[String], recipient: &str) -> Value {
    let cards: Vec<Value> = media_ids
        .iter()
        .enumerate()
        .map(|(idx, media_id)| {
            json!({
                "card_index": idx,
                "components": [
                    {
                        "type": "header",
                        "parameters": [{"type": "image", "image": {"id": media_id}}],
                    },
                    {
                        "type": "button",
                        "sub_type": "quick_reply",
                        "index": "0",
                        "parameters": [{"type": "payload", "payload": format!("more-item-{idx}")}],
                    },
                    {
                        "type": "button",
                        "sub_type": "url",
                        "index": "1",
                        "parameters": [{"type": "text", "text": format!("url-item-{idx}")}],
                    },
                ],
            })
        })
        .collect();

    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": recipient,
        "type": "template",
        "template": {
            "name": template,
            "language": {"code": language},
            "components": [
                {"type": "body"},
                {"type": "carousel", "cards": cards},
            ],
        },
    })
}

fn text_header(header: Option<&String>) -> Value {
    header.map_or(Value::Null, |text| json!({"type": "text", "text": text}))
}

fn text_footer(footer: Option<&String>) -> Value {
    footer.map_or(Value::Null, |text| json!({"text": text}))
}

fn bot_payload(message: &BotMessage, recipient: &str) -> Value {
    let (kind, field, value) = bot_parts(message);
    let mut payload = json!({
        "messaging_product": "whatsapp",
        "to": recipient,
        "type": kind,
    });
    payload
        .as_object_mut()
        .expect("payload literal is an object")
        .insert(field.to_string(), value);
    payload
}

/// Maps a bot message to its wire type tag, payload field name, and
/// payload value.
fn bot_parts(message: &BotMessage) -> (&'static str, &'static str, Value) {
    match message {
        BotMessage::Text { body } => (
            "text",
            "text",
            json!({"preview_url": false, "body": body}),
        ),
        BotMessage::Image { media_id, caption } => (
            "image",
            "image",
            json!({"id": media_id, "caption": caption}),
        ),
        BotMessage::Document {
            media_id,
            caption,
            filename,
        } => (
            "document",
            "document",
            json!({
                "id": media_id,
                "caption": caption,
                "filename": filename.as_deref().unwrap_or("document"),
            }),
        ),
        // A video bot message is always the plain media form; there is
        // deliberately no interactive-video shape.
        BotMessage::Video { media_id, caption } => (
            "video",
            "video",
            json!({"id": media_id, "caption": caption}),
        ),
        BotMessage::Location {
            latitude,
            longitude,
            name,
            address,
        } => (
            "location",
            "location",
            json!({
                "latitude": latitude,
                "longitude": longitude,
                "name": name,
                "address": address,
            }),
        ),
        interactive => ("interactive", "interactive", interactive_value(interactive)),
    }
}

fn interactive_value(message: &BotMessage) -> Value {
    match message {
        BotMessage::List {
            header,
            body,
            footer,
            sections,
        } => json!({
            "type": "list",
            "header": text_header(header.as_ref()),
            "body": {"text": body},
            "footer": text_footer(footer.as_ref()),
            "action": {"button": "Choose an option", "sections": sections},
        }),
        BotMessage::ReplyButtons {
            body,
            footer,
            buttons,
        } => json!({
            "type": "button",
            "body": {"text": body},
            "footer": text_footer(footer.as_ref()),
            "action": {"buttons": buttons},
        }),
        BotMessage::Product {
            body,
            footer,
            catalog_id,
            product_retailer_id,
        } => json!({
            "type": "product",
            "body": {"text": body},
            "footer": text_footer(footer.as_ref()),
            "action": {
                "catalog_id": catalog_id,
                "product_retailer_id": product_retailer_id,
            },
        }),
        BotMessage::ProductList {
            header,
            body,
            footer,
            catalog_id,
            sections,
        } => json!({
            "type": "product_list",
            "header": text_header(header.as_ref()),
            "body": {"text": body},
            "footer": text_footer(footer.as_ref()),
            "action": {"catalog_id": catalog_id, "sections": sections},
        }),
        BotMessage::LocationRequest { body } => json!({
            "type": "location_request_message",
            "body": {"text": body},
            "action": {"name": "send_location"},
        }),
        _ => unreachable!("plain bot messages have no interactive form"),
    }
}
