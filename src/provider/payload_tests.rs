//! Tests for payload construction.

use serde_json::{Value, json};

use super::payload::{BotMessage, MediaKind, MessageKind, TemplateContext, build_payload};

fn template_ctx(media: MediaKind, media_id: Option<&str>) -> TemplateContext {
    TemplateContext {
        name: "spring_sale".into(),
        language: "en_US".into(),
        media,
        media_id: media_id.map(ToString::to_string),
    }
}

fn vars(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

mod template_messages {
    use super::*;

    #[test]
    fn builds_basic_envelope() {
        let kind = MessageKind::Template(template_ctx(MediaKind::Text, None));
        let payload = build_payload(&kind, "15551230001", &[]);

        assert_eq!(payload["messaging_product"], "whatsapp");
        assert_eq!(payload["to"], "15551230001");
        assert_eq!(payload["type"], "template");
        assert_eq!(payload["template"]["name"], "spring_sale");
        assert_eq!(payload["template"]["language"]["code"], "en_US");
    }

    #[test]
    fn body_parameters_follow_variable_order() {
        let kind = MessageKind::Template(template_ctx(MediaKind::Text, None));
        let payload = build_payload(&kind, "1", &vars(&["Alice", "42"]));

        let body = &payload["template"]["components"][1];
        assert_eq!(body["type"], "body");
        assert_eq!(
            body["parameters"],
            json!([
                {"type": "text", "text": "Alice"},
                {"type": "text", "text": "42"},
            ])
        );
    }

    #[test]
    fn media_id_lands_in_header_component() {
        let kind = MessageKind::Template(template_ctx(MediaKind::Image, Some("MEDIA1")));
        let payload = build_payload(&kind, "1", &[]);

        let header = &payload["template"]["components"][0];
        assert_eq!(header["type"], "header");
        assert_eq!(
            header["parameters"],
            json!([{"type": "image", "image": {"id": "MEDIA1"}}])
        );
    }

    #[test]
    fn text_media_never_produces_header_parameters() {
        // A media id submitted alongside a TEXT template is ignored.
        let kind = MessageKind::Template(template_ctx(MediaKind::Text, Some("MEDIA1")));
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["template"]["components"][0]["parameters"], json!([]));
    }

    #[test]
    fn context_tag_embeds_template_identity() {
        let kind = MessageKind::Template(template_ctx(MediaKind::Video, Some("M2")));
        let payload = build_payload(&kind, "1", &[]);

        let tag = payload["context"]["message_id"].as_str().unwrap();
        assert!(tag.starts_with("template_spring_sale_"));
        assert!(tag.contains("VIDEO"));
    }
}

mod otp_messages {
    use super::*;

    #[test]
    fn copy_code_button_carries_first_variable() {
        let kind = MessageKind::Otp(template_ctx(MediaKind::Text, None));
        let payload = build_payload(&kind, "1", &vars(&["123456"]));

        let button = &payload["template"]["components"][2];
        assert_eq!(button["type"], "button");
        assert_eq!(button["sub_type"], "url");
        assert_eq!(button["parameters"], json!([{"type": "text", "text": "123456"}]));
    }

    #[test]
    fn empty_variables_produce_empty_button_text() {
        let kind = MessageKind::Otp(template_ctx(MediaKind::Text, None));
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(
            payload["template"]["components"][2]["parameters"][0]["text"],
            ""
        );
    }
}

mod flow_messages {
    use super::*;

    #[test]
    fn flow_button_carries_flow_id_payload() {
        let kind = MessageKind::Flow {
            template: "onboarding".into(),
            language: "en".into(),
            flow_id: "FLOW9".into(),
        };
        let payload = build_payload(&kind, "15551230001", &[]);

        assert_eq!(payload["to"], "15551230001");
        let button = &payload["template"]["components"][0];
        assert_eq!(button["sub_type"], "flow");
        assert_eq!(
            button["parameters"],
            json!([{"type": "payload", "payload": "FLOW9"}])
        );
    }
}

mod carousel_messages {
    use super::*;

    #[test]
    fn one_card_per_media_id_with_running_index() {
        let kind = MessageKind::Carousel {
            template: "catalog".into(),
            language: "en_US".into(),
            media_ids: vec!["M0".into(), "M1".into(), "M2".into()],
        };
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["recipient_type"], "individual");
        let cards = payload["template"]["components"][1]["cards"]
            .as_array()
            .unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2]["card_index"], 2);
        assert_eq!(
            cards[2]["components"][0]["parameters"][0]["image"]["id"],
            "M2"
        );
        assert_eq!(
            cards[1]["components"][1]["parameters"][0]["payload"],
            "more-item-1"
        );
    }
}

mod bot_messages {
    use super::*;

    #[test]
    fn text_message_disables_preview() {
        let kind = MessageKind::Bot(BotMessage::Text { body: "hi".into() });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["type"], "text");
        assert_eq!(payload["text"], json!({"preview_url": false, "body": "hi"}));
    }

    #[test]
    fn video_is_the_plain_media_message() {
        // The interactive-video shape is intentionally not produced;
        // a video bot message is always the plain media form.
        let kind = MessageKind::Bot(BotMessage::Video {
            media_id: "M1".into(),
            caption: Some("clip".into()),
        });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["type"], "video");
        assert_eq!(payload["video"], json!({"id": "M1", "caption": "clip"}));
        assert!(payload.get("interactive").is_none());
    }

    #[test]
    fn document_defaults_filename() {
        let kind = MessageKind::Bot(BotMessage::Document {
            media_id: "M1".into(),
            caption: None,
            filename: None,
        });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["document"]["filename"], "document");
        assert_eq!(payload["document"]["caption"], Value::Null);
    }

    #[test]
    fn list_message_passes_sections_through() {
        let sections = json!([{"title": "S1", "rows": [{"id": "r1", "title": "Row"}]}]);
        let kind = MessageKind::Bot(BotMessage::List {
            header: Some("Menu".into()),
            body: "Pick one".into(),
            footer: None,
            sections: sections.clone(),
        });
        let payload = build_payload(&kind, "1", &[]);

        let interactive = &payload["interactive"];
        assert_eq!(interactive["type"], "list");
        assert_eq!(interactive["header"], json!({"type": "text", "text": "Menu"}));
        assert_eq!(interactive["footer"], Value::Null);
        assert_eq!(interactive["action"]["sections"], sections);
        assert_eq!(interactive["action"]["button"], "Choose an option");
    }

    #[test]
    fn reply_buttons_pass_through() {
        let buttons = json!([{"type": "reply", "reply": {"id": "y", "title": "Yes"}}]);
        let kind = MessageKind::Bot(BotMessage::ReplyButtons {
            body: "Confirm?".into(),
            footer: Some("foot".into()),
            buttons: buttons.clone(),
        });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["interactive"]["type"], "button");
        assert_eq!(payload["interactive"]["action"]["buttons"], buttons);
        assert_eq!(payload["interactive"]["footer"], json!({"text": "foot"}));
    }

    #[test]
    fn product_messages_reference_catalog() {
        let kind = MessageKind::Bot(BotMessage::Product {
            body: "Deal".into(),
            footer: None,
            catalog_id: "CAT1".into(),
            product_retailer_id: "SKU1".into(),
        });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["interactive"]["type"], "product");
        assert_eq!(payload["interactive"]["action"]["catalog_id"], "CAT1");
        assert_eq!(payload["interactive"]["action"]["product_retailer_id"], "SKU1");
    }

    #[test]
    fn location_message_carries_coordinates() {
        let kind = MessageKind::Bot(BotMessage::Location {
            latitude: 48.8584,
            longitude: 2.2945,
            name: Some("Tower".into()),
            address: None,
        });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["type"], "location");
        assert_eq!(payload["location"]["latitude"], 48.8584);
        assert_eq!(payload["location"]["name"], "Tower");
    }

    #[test]
    fn location_request_asks_for_location() {
        let kind = MessageKind::Bot(BotMessage::LocationRequest {
            body: "Where are you?".into(),
        });
        let payload = build_payload(&kind, "1", &[]);

        assert_eq!(payload["interactive"]["type"], "location_request_message");
        assert_eq!(payload["interactive"]["action"]["name"], "send_location");
    }
}

mod probe_messages {
    use super::*;

    #[test]
    fn probe_is_plain_text_without_preview() {
        let kind = MessageKind::Probe {
            text: "ping".into(),
        };
        let payload = build_payload(&kind, "15551230001", &[]);

        assert_eq!(
            payload,
            json!({
                "messaging_product": "whatsapp",
                "to": "15551230001",
                "type": "text",
                "text": {"preview_url": false, "body": "ping"},
            })
        );
    }
}

mod kind_names {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(
            MessageKind::Template(template_ctx(MediaKind::Text, None)).name(),
            "template"
        );
        assert_eq!(MessageKind::Probe { text: String::new() }.name(), "probe");
    }
}
