//! Tests for `MessageSender`.

use std::sync::Arc;

use super::sender::MessageSender;
use super::test_fixtures::MockClient;
use super::{FailureKind, MessageKind, SendOutcome};

fn graph_base() -> url::Url {
    url::Url::parse("https://graph.example.com").unwrap()
}

fn probe() -> MessageKind {
    MessageKind::Probe {
        text: "ping".into(),
    }
}

mod request_shape {
    use super::*;

    #[tokio::test]
    async fn posts_to_per_endpoint_messages_path() {
        let client = Arc::new(MockClient::success());
        let sender = MessageSender::new(client.clone(), graph_base());

        sender.send("tok", "424242", &probe(), "15551230001", &[]).await;

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(
            requests[0].url.as_str(),
            "https://graph.example.com/v20.0/424242/messages"
        );
    }

    #[tokio::test]
    async fn carries_bearer_token_and_json_content_type() {
        let client = Arc::new(MockClient::success());
        let sender = MessageSender::new(client.clone(), graph_base());

        sender.send("secret-token", "1", &probe(), "2", &[]).await;

        let requests = client.captured_requests();
        assert_eq!(
            requests[0].headers.get(http::header::AUTHORIZATION).unwrap(),
            "Bearer secret-token"
        );
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn api_version_is_overridable() {
        let client = Arc::new(MockClient::success());
        let sender = MessageSender::new(client.clone(), graph_base()).with_api_version("v21.0");

        sender.send("tok", "1", &probe(), "2", &[]).await;

        assert!(
            client.captured_requests()[0]
                .url
                .path()
                .starts_with("/v21.0/")
        );
    }
}

mod outcome_mapping {
    use super::*;

    #[tokio::test]
    async fn http_200_is_success_with_response_evidence() {
        let client = MockClient::success();
        let sender = MessageSender::new(client, graph_base());

        let outcome = sender.send("tok", "1", &probe(), "15551230001", &[]).await;

        match outcome {
            SendOutcome::Success {
                recipient,
                response,
            } => {
                assert_eq!(recipient, "15551230001");
                assert!(response.contains("wamid.test"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_200_is_failed_with_status_and_body() {
        let client = MockClient::always_status(
            http::StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"bad token"}}"#,
        );
        let sender = MessageSender::new(client, graph_base());

        let outcome = sender.send("tok", "1", &probe(), "15551230001", &[]).await;

        match outcome {
            SendOutcome::Failed {
                recipient,
                kind,
                detail,
            } => {
                assert_eq!(recipient, "15551230001");
                assert_eq!(kind, FailureKind::Status(http::StatusCode::UNAUTHORIZED));
                assert!(detail.contains("bad token"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_200_success_family_status_is_still_failed() {
        // The provider contract is exactly 200; 201/204 are rejections.
        let client = MockClient::always_status(http::StatusCode::NO_CONTENT, "");
        let sender = MessageSender::new(client, graph_base());

        let outcome = sender.send("tok", "1", &probe(), "2", &[]).await;

        assert_eq!(outcome.status_code(), Some(http::StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn transport_fault_is_client_error_classification() {
        let client = MockClient::failing_transport();
        let sender = MessageSender::new(client, graph_base());

        let outcome = sender.send("tok", "1", &probe(), "15551230001", &[]).await;

        match outcome {
            SendOutcome::Failed { kind, detail, .. } => {
                assert_eq!(kind, FailureKind::Transport);
                assert!(detail.contains("timed out"));
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_invocation_makes_exactly_one_attempt() {
        let client = Arc::new(MockClient::failing_transport());
        let sender = MessageSender::new(client.clone(), graph_base());

        sender.send("tok", "1", &probe(), "2", &[]).await;

        assert_eq!(client.calls(), 1);
    }
}

mod payload_wiring {
    use super::*;
    use super::super::test_fixtures::request_recipient;
    use super::super::{MediaKind, TemplateContext};

    #[tokio::test]
    async fn recipient_and_variables_reach_the_body() {
        let client = Arc::new(MockClient::success());
        let sender = MessageSender::new(client.clone(), graph_base());
        let kind = MessageKind::Template(TemplateContext {
            name: "promo".into(),
            language: "en".into(),
            media: MediaKind::Text,
            media_id: None,
        });

        sender
            .send("tok", "1", &kind, "15551230007", &["Bob".to_string()])
            .await;

        let requests = client.captured_requests();
        assert_eq!(
            request_recipient(&requests[0]).as_deref(),
            Some("15551230007")
        );
        let body: serde_json::Value =
            serde_json::from_slice(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body["template"]["components"][1]["parameters"][0]["text"],
            "Bob"
        );
    }
}
