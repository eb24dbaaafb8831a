//! Integration tests for configuration files.

use gitea_connect::{AuthType, Config, ConfigError, ServerConfig};
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config {
        server: ServerConfig {
            url: Some("https://gitea.example.com".into()),
        },
        ..Default::default()
    };
    config.auth.kind = AuthType::Token;
    config.auth.token_env = Some("GITEA_TOKEN".into());
    config.http.timeout_secs = 12;

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\nurl = ").unwrap();

    assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_unknown_auth_type_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[auth]\ntype = \"kerberos\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownAuthType(ref name) if name == "kerberos"));
    assert_eq!(err.to_string(), "Unknown auth type: kerberos");
}
