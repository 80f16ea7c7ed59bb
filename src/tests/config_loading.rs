#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use serial_test::serial;

    use crate::config::client::ClientConfig;
    use crate::config::in_cluster::{SERVICE_CA_CERT_FILE, SERVICE_TOKEN_FILE};
    use crate::config::proc_loader::{expand_env_vars, file_to_config, parse_config};
    use crate::config::settings::{LogFormat, VerifySsl};
    use crate::utils::config_loader;
    use crate::utils::logging::{self, LogLevel};
    use crate::tests::common::token_file;

    #[tokio::test]
    async fn empty_document_gives_defaults() {
        let cfg = parse_config("").await.unwrap();
        assert_eq!(cfg.client.api_server, "https://kubernetes.default.svc.cluster.local");
        assert_eq!(cfg.client.timeout_seconds, 20);
        assert_eq!(cfg.client.stream_timeout_seconds, 270);
        assert_eq!(cfg.client.watcher_cache_size, 1000);
        assert_eq!(cfg.client.verify_ssl, VerifySsl::Flag(true));
        assert!(cfg.in_cluster.is_none());
        assert!(cfg.logging.is_none());
    }

    #[tokio::test]
    async fn full_document_is_parsed() {
        let yaml = r#"
client:
  api_server: https://10.0.0.1:6443
  api_token: static-token
  cert: /etc/client.crt
  verify_ssl: /etc/ca.crt
  debug: true
  timeout_seconds: 5
in_cluster:
  refresh_interval_seconds: 30
logging:
  level: debug
  format: json
"#;
        let cfg = parse_config(yaml).await.unwrap();

        assert_eq!(cfg.client.api_server, "https://10.0.0.1:6443");
        assert_eq!(cfg.client.api_token, "static-token");
        assert_eq!(cfg.client.cert, Some(PathBuf::from("/etc/client.crt")));
        assert_eq!(cfg.client.verify_ssl, VerifySsl::CaBundle(PathBuf::from("/etc/ca.crt")));
        assert!(cfg.client.debug);
        assert_eq!(cfg.client.timeout_seconds, 5);
        // untouched fields keep defaults
        assert_eq!(cfg.client.stream_timeout_seconds, 270);

        let in_cluster = cfg.in_cluster.unwrap();
        assert_eq!(in_cluster.token_file, PathBuf::from(SERVICE_TOKEN_FILE));
        assert_eq!(in_cluster.ca_cert_file, PathBuf::from(SERVICE_CA_CERT_FILE));
        assert_eq!(in_cluster.refresh_interval_seconds, 30);

        let logging = cfg.logging.unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[tokio::test]
    async fn verify_ssl_accepts_false() {
        let cfg = parse_config("client:\n  verify_ssl: false\n").await.unwrap();
        assert_eq!(cfg.client.verify_ssl, VerifySsl::Flag(false));
        assert!(!cfg.client.verify_ssl.is_enabled());
    }

    #[tokio::test]
    async fn validation_reports_every_issue() {
        let yaml = r#"
client:
  api_server: "not a url"
  timeout_seconds: 0
  watcher_cache_size: 0
in_cluster:
  token_file: ""
  refresh_interval_seconds: 0
logging:
  level: loud
"#;
        let err = parse_config(yaml).await.unwrap_err().to_string();

        assert!(err.contains("client.api_server"), "{}", err);
        assert!(err.contains("client.timeout_seconds"), "{}", err);
        assert!(err.contains("client.watcher_cache_size"), "{}", err);
        assert!(err.contains("in_cluster.token_file"), "{}", err);
        assert!(err.contains("in_cluster.refresh_interval_seconds"), "{}", err);
        assert!(err.contains("logging.level 'loud'"), "{}", err);
    }

    #[tokio::test]
    async fn api_server_without_scheme_is_rejected() {
        let err = parse_config("client:\n  api_server: kubernetes.default.svc\n")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absolute http(s) URL"));
    }

    #[tokio::test]
    async fn malformed_yaml_is_an_error() {
        assert!(parse_config("client: [unclosed").await.is_err());
    }

    #[test]
    #[serial]
    fn env_vars_are_expanded_with_defaults() {
        std::env::set_var("K8S_TOKEN_SOURCE_TEST_SERVER", "https://api.example:6443");
        std::env::remove_var("K8S_TOKEN_SOURCE_TEST_MISSING");

        let out = expand_env_vars(
            "a: ${K8S_TOKEN_SOURCE_TEST_SERVER}\nb: ${K8S_TOKEN_SOURCE_TEST_MISSING:60}\nc: ${K8S_TOKEN_SOURCE_TEST_MISSING}",
        )
        .unwrap();

        assert_eq!(out, "a: https://api.example:6443\nb: 60\nc: ");
        std::env::remove_var("K8S_TOKEN_SOURCE_TEST_SERVER");
    }

    #[tokio::test]
    #[serial]
    async fn config_file_is_loaded_with_env_expansion() {
        std::env::set_var("K8S_TOKEN_SOURCE_TEST_TIMEOUT", "42");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "client:\n  timeout_seconds: ${K8S_TOKEN_SOURCE_TEST_TIMEOUT}\n").unwrap();

        let cfg = file_to_config(&path).await.unwrap();
        assert_eq!(cfg.client.timeout_seconds, 42);
        std::env::remove_var("K8S_TOKEN_SOURCE_TEST_TIMEOUT");
    }

    #[tokio::test]
    async fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = config_loader::run(Some(dir.path().join("nope.yaml").to_str().unwrap()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }

    #[tokio::test]
    async fn no_config_path_means_defaults() {
        let cfg = config_loader::run(None).await.unwrap();
        assert!(cfg.in_cluster.is_none());
        assert_eq!(cfg.client.api_token, "");
    }

    #[tokio::test]
    async fn client_config_from_settings_wires_token_file() {
        let (dir, token_path) = token_file("file-token\n");
        let ca_path = dir.path().join("ca.crt");
        std::fs::write(&ca_path, "ca").unwrap();
        let yaml = format!(
            "client:\n  api_token: ignored\n  watcher_cache_size: 5\nin_cluster:\n  token_file: {}\n  ca_cert_file: {}\n",
            token_path.display(),
            ca_path.display()
        );

        let cfg = parse_config(&yaml).await.unwrap();
        let client = ClientConfig::from_settings(&cfg).await.unwrap();

        assert_eq!(client.watcher_cache_size, 5);
        assert_eq!(client.verify_ssl, VerifySsl::CaBundle(ca_path));
        assert_eq!(client.bearer_token().await.unwrap().as_deref(), Some("file-token"));
    }

    #[tokio::test]
    async fn client_config_from_settings_fails_on_missing_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!("in_cluster:\n  token_file: {}\n", dir.path().join("token").display());

        let cfg = parse_config(&yaml).await.unwrap();
        let err = ClientConfig::from_settings(&cfg).await.unwrap_err();

        assert!(err.to_string().contains("in-cluster configuration failed"));
        assert!(format!("{:#}", err).contains("failed to read token file"));
    }

    #[tokio::test]
    async fn log_level_precedence() {
        let debug_client = parse_config("client:\n  debug: true\n").await.unwrap();
        assert_eq!(logging::resolve(&debug_client, None).level, "debug");
        assert_eq!(logging::resolve(&debug_client, Some(LogLevel::Warn)).level, "warn");

        let with_logging = parse_config("client:\n  debug: true\nlogging:\n  level: error\n").await.unwrap();
        assert_eq!(logging::resolve(&with_logging, None).level, "error");
        assert_eq!(logging::resolve(&with_logging, None).format, LogFormat::Compact);

        let plain = parse_config("").await.unwrap();
        assert_eq!(logging::resolve(&plain, None).level, "info");
    }
}
