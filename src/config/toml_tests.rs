//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [relay]
            notify_url = "https://reports.example.com/notify_user/"
            account_url = "https://accounts.example.com"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.relay.notify_url.as_deref(),
            Some("https://reports.example.com/notify_user/")
        );
        assert_eq!(
            config.relay.account_url.as_deref(),
            Some("https://accounts.example.com")
        );
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [relay]
            notify_url = "https://reports.example.com/notify_user/"
            account_url = "https://accounts.example.com"

            [provider]
            graph_url = "https://graph.example.com"
            api_version = "v21.0"
            send_timeout = 15
            pool_limit = 500

            [dispatch]
            batch_size = 40
            batch_pause_ms = 350
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.provider.graph_url.as_deref(),
            Some("https://graph.example.com")
        );
        assert_eq!(config.provider.api_version.as_deref(), Some("v21.0"));
        assert_eq!(config.provider.send_timeout, Some(15));
        assert_eq!(config.provider.pool_limit, Some(500));
        assert_eq!(config.dispatch.batch_size, Some(40));
        assert_eq!(config.dispatch.batch_pause_ms, Some(350));
    }

    #[test]
    fn empty_document_parses_with_default_sections() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.relay.notify_url.is_none());
        assert!(config.provider.graph_url.is_none());
        assert!(config.dispatch.batch_size.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml = r#"
            [relay]
            webhook = "https://example.com"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let toml = r"
            [retry]
            max_attempts = 3
        ";

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(TomlConfig::parse("not toml at all [").is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn template_is_valid_toml_with_defaults_commented_out() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        // Every value is a comment; parsing yields an empty config.
        assert!(config.relay.notify_url.is_none());
        assert!(config.relay.account_url.is_none());
    }

    #[test]
    fn template_documents_required_fields() {
        let template = default_config_template();
        assert!(template.contains("notify_url"));
        assert!(template.contains("account_url"));
        assert!(template.contains("batch_size"));
    }
}
