//! Tests for job file parsing.

use crate::provider::{BotMessage, MediaKind};

use super::ConfigError;
use super::jobfile::{JobFile, JobKind, JobRequest};

fn parse(content: &str) -> JobFile {
    JobFile::parse(content).unwrap()
}

mod template_jobs {
    use super::*;

    #[test]
    fn parses_and_converts_a_full_template_job() {
        let file = parse(
            r#"
            kind = "template"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            template_name = "promo"
            language = "en_US"
            media_type = "IMAGE"
            media_id = "MEDIA1"
            contacts = ["15551230001", "15551230002"]
            variables = ["Alice"]
            "#,
        );

        assert_eq!(file.kind, JobKind::Template);
        match file.into_request().unwrap() {
            JobRequest::Template(req) => {
                assert_eq!(req.template_name, "promo");
                assert_eq!(req.media, MediaKind::Image);
                assert_eq!(req.media_id.as_deref(), Some("MEDIA1"));
                assert_eq!(req.contacts.len(), 2);
                assert_eq!(req.variables, vec!["Alice".to_string()]);
            }
            other => panic!("expected template request, got {other:?}"),
        }
    }

    #[test]
    fn csv_variable_rows_are_parsed() {
        let file = parse(
            r#"
            kind = "template"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            template_name = "promo"
            language = "en"
            contacts = ["15551230001"]
            csv_variables = [["15559990001", "Ada"]]
            "#,
        );

        match file.into_request().unwrap() {
            JobRequest::Template(req) => {
                let rows = req.csv_variables.unwrap();
                assert_eq!(rows, vec![vec!["15559990001".to_string(), "Ada".to_string()]]);
            }
            other => panic!("expected template request, got {other:?}"),
        }
    }

    #[test]
    fn missing_template_name_is_rejected() {
        let file = parse(
            r#"
            kind = "template"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            language = "en"
            contacts = ["15551230001"]
            "#,
        );

        let err = file.into_request().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { field, .. } if field == "template_name"
        ));
    }

    #[test]
    fn media_type_is_case_insensitive_and_optional() {
        let file = parse(
            r#"
            kind = "template"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            template_name = "promo"
            language = "en"
            media_type = "video"
            contacts = ["15551230001"]
            "#,
        );

        match file.into_request().unwrap() {
            JobRequest::Template(req) => assert_eq!(req.media, MediaKind::Video),
            other => panic!("expected template request, got {other:?}"),
        }
    }

    #[test]
    fn unknown_media_type_is_rejected() {
        let file = parse(
            r#"
            kind = "template"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            template_name = "promo"
            language = "en"
            media_type = "HOLOGRAM"
            contacts = ["15551230001"]
            "#,
        );

        let err = file.into_request().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field, .. } if field == "media_type"
        ));
    }
}

mod other_kinds {
    use super::*;

    #[test]
    fn flow_job_requires_flow_id() {
        let file = parse(
            r#"
            kind = "flow"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            template_name = "onboarding"
            language = "en"
            contacts = ["15551230001"]
            "#,
        );

        let err = file.into_request().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { field, .. } if field == "flow_id"
        ));
    }

    #[test]
    fn carousel_job_carries_media_ids() {
        let file = parse(
            r#"
            kind = "carousel"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            template_name = "gallery"
            media_ids = ["M0", "M1"]
            contacts = ["15551230001"]
            "#,
        );

        match file.into_request().unwrap() {
            JobRequest::Carousel(req) => {
                assert_eq!(req.media_ids, vec!["M0".to_string(), "M1".to_string()]);
            }
            other => panic!("expected carousel request, got {other:?}"),
        }
    }

    #[test]
    fn probe_job_requires_message_text() {
        let file = parse(
            r#"
            kind = "probe"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            contacts = ["15551230001"]
            "#,
        );

        let err = file.into_request().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { field, .. } if field == "message_text"
        ));
    }
}

mod bot_jobs {
    use super::*;

    #[test]
    fn bot_job_requires_the_bot_table() {
        let file = parse(
            r#"
            kind = "bot"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            contacts = ["15551230001"]
            "#,
        );

        let err = file.into_request().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { field, .. } if field == "bot"
        ));
    }

    #[test]
    fn list_bot_message_converts_with_sections() {
        let file = parse(
            r#"
            kind = "bot"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            contacts = ["15551230001"]

            [bot]
            type = "list"
            header = "Menu"
            body = "Pick one"

            [[bot.sections]]
            title = "S1"
            "#,
        );

        match file.into_request().unwrap() {
            JobRequest::Bot(req) => match req.message {
                BotMessage::List { header, sections, .. } => {
                    assert_eq!(header.as_deref(), Some("Menu"));
                    assert_eq!(sections[0]["title"], "S1");
                }
                other => panic!("expected list message, got {other:?}"),
            },
            other => panic!("expected bot request, got {other:?}"),
        }
    }

    #[test]
    fn location_bot_message_converts() {
        let file = parse(
            r#"
            kind = "bot"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            contacts = ["15551230001"]

            [bot]
            type = "location"
            latitude = 48.85
            longitude = 2.29
            name = "Tower"
            "#,
        );

        match file.into_request().unwrap() {
            JobRequest::Bot(req) => match req.message {
                BotMessage::Location { latitude, name, .. } => {
                    assert!((latitude - 48.85).abs() < f64::EPSILON);
                    assert_eq!(name.as_deref(), Some("Tower"));
                }
                other => panic!("expected location message, got {other:?}"),
            },
            other => panic!("expected bot request, got {other:?}"),
        }
    }
}

mod structure {
    use super::*;

    #[test]
    fn unknown_fields_are_rejected() {
        let result = JobFile::parse(
            r#"
            kind = "probe"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            message_text = "ping"
            contacts = []
            surprise = true
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = JobFile::parse(
            r#"
            kind = "broadcastogram"
            user_id = "u1"
            api_token = "secret"
            unique_id = "uid-1"
            "#,
        );

        assert!(result.is_err());
    }
}
