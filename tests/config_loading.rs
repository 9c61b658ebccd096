//! Integration tests for config loading across all file formats.

use std::path::Path;

use forwardmark::config::model::Config;
use forwardmark::config::validation::validate;
use forwardmark::config::{load_file, parse_config_str};
use forwardmark::error::ForwardmarkError;
use forwardmark::middleware::FieldSource;

fn load_demo(name: &str) -> String {
    let path = format!("demos/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[test]
fn yaml_demo_loads_and_validates() {
    let content = load_demo("forwardmark.yaml");
    let config = parse_config_str("yaml", &content, "forwardmark.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.name, "edge-demo");
    assert!(config.forwarded.forwarded_by_hostname);
    assert!(config.forwarded.forwarded_for_remote);
}

#[test]
fn header_sourced_demo_loads_and_validates() {
    let content = load_demo("behind-cdn.yaml");
    let config = parse_config_str("yaml", &content, "behind-cdn.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.timeout, 10_000);
    assert_eq!(config.forwarded.forwarded_by_static, "shield-eu-1");
    assert_eq!(config.forwarded.forwarded_for_header, "CF-Connecting-IP");
}

#[cfg(feature = "json")]
#[test]
fn json_demo_loads_and_validates() {
    let content = load_demo("forwardmark.json");
    let config = parse_config_str("json", &content, "forwardmark.json").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.upstream, "http://localhost:8080");
}

#[cfg(feature = "toml")]
#[test]
fn toml_demo_loads_and_validates() {
    let content = load_demo("forwardmark.toml");
    let config = parse_config_str("toml", &content, "forwardmark.toml").unwrap();
    validate(&config).unwrap();
    assert!(config.forwarded.forwarded_by_hostname);
}

#[cfg(all(feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    let yaml = parse_config_str("yaml", &load_demo("forwardmark.yaml"), "yaml").unwrap();
    let json = parse_config_str("json", &load_demo("forwardmark.json"), "json").unwrap();
    let toml = parse_config_str("toml", &load_demo("forwardmark.toml"), "toml").unwrap();

    assert_eq!(yaml.forwarded, json.forwarded);
    assert_eq!(yaml.forwarded, toml.forwarded);
    assert_eq!(yaml.upstream, json.upstream);
    assert_eq!(yaml.upstream, toml.upstream);
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(matches!(result, Err(ForwardmarkError::UnsupportedFormat(_))));
}

#[test]
fn unknown_option_is_rejected() {
    let json = r#"{"upstream": "http://a", "forwarded": {"forwardedByHost": true}}"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

#[test]
fn omitted_options_default_to_disabled() {
    let config: Config = serde_json::from_str(r#"{"upstream": "http://a:80"}"#).unwrap();
    assert_eq!(config.name, "forwardmark");
    assert_eq!(config.timeout, 5000);
    assert!(config.strip_hop_by_hop);
    assert!(!config.forwarded.forwarded_by_hostname);
    assert!(config.forwarded.forwarded_for_header.is_empty());
}

#[test]
fn serialization_skips_defaults() {
    let config = Config::new("http://a:80");
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json, serde_json::json!({ "upstream": "http://a:80" }));
}

#[tokio::test]
async fn load_file_reports_missing_file() {
    let result = load_file(Path::new("demos/does-not-exist.yaml")).await;
    assert!(matches!(
        result,
        Err(ForwardmarkError::ConfigFileNotFound { .. })
    ));
}

#[tokio::test]
async fn load_file_parses_and_validates() {
    let config = load_file(Path::new("demos/forwardmark.yaml")).await.unwrap();
    assert_eq!(config.upstream, "http://localhost:8080");
}

#[test]
fn header_sourced_demo_selects_one_source_per_field() {
    let content = load_demo("behind-cdn.yaml");
    let config = parse_config_str("yaml", &content, "behind-cdn.yaml").unwrap();

    assert_eq!(
        config.forwarded.by_source(),
        FieldSource::Static("shield-eu-1".into())
    );
    assert_eq!(
        config.forwarded.for_source(),
        FieldSource::Header("CF-Connecting-IP".into())
    );
}
