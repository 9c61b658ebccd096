//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors: a missing or non-HTTP upstream, an empty instance name, a zero
//! timeout, header names that cannot appear on the wire, and static values
//! that cannot be encoded as header values. It does not reject configs that
//! set several sources for the same field; [`format_validation_report`]
//! shows which one wins instead.
//!
//! Validation is stricter than the annotator itself. The annotator accepts
//! any options and resolves an unusable header name to an empty field, as
//! the Traefik plugin did; a config file naming such a header is rejected
//! here at load time instead.

use http::{HeaderName, HeaderValue};
use url::Url;

use super::model::{Config, ForwardedOptions};
use crate::error::ValidationError;
use crate::middleware::FieldSource;

/// Validate the upstream URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{url}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate a header name option. Blank means "not configured" and passes.
pub fn validate_header_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || HeaderName::from_bytes(trimmed.as_bytes()).is_ok() {
        Ok(())
    } else {
        Err(format!("'{trimmed}' is not a valid HTTP header name"))
    }
}

/// Validate a static field value. Blank means "not configured" and passes.
pub fn validate_static_value(value: &str) -> Result<(), String> {
    if HeaderValue::from_str(value.trim()).is_ok() {
        Ok(())
    } else {
        Err("value contains characters not allowed in a header".into())
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.trim().is_empty() {
        errors.push(ValidationError {
            field: "upstream".into(),
            message: "upstream URL is required".into(),
            suggestion: Some("e.g. 'http://localhost:8080'".into()),
        });
    } else if let Err(msg) = validate_upstream_url(&config.upstream) {
        errors.push(ValidationError {
            field: "upstream".into(),
            message: msg,
            suggestion: if config.upstream.contains("://") {
                None
            } else {
                Some(format!("did you mean 'http://{}'?", config.upstream))
            },
        });
    }

    if config.name.trim().is_empty() {
        errors.push(ValidationError {
            field: "name".into(),
            message: "instance name cannot be empty".into(),
            suggestion: None,
        });
    }

    if config.timeout == 0 {
        errors.push(ValidationError {
            field: "timeout".into(),
            message: "timeout must be greater than 0".into(),
            suggestion: None,
        });
    }

    let fwd = &config.forwarded;
    for (field, name) in [
        ("forwarded.forwardedByHeader", &fwd.forwarded_by_header),
        ("forwarded.forwardedForHeader", &fwd.forwarded_for_header),
    ] {
        if let Err(msg) = validate_header_name(name) {
            errors.push(ValidationError {
                field: field.into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    for (field, value) in [
        ("forwarded.forwardedByStatic", &fwd.forwarded_by_static),
        ("forwarded.forwardedForStatic", &fwd.forwarded_for_static),
    ] {
        if let Err(msg) = validate_static_value(value) {
            errors.push(ValidationError {
                field: field.into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Configured-but-unused options for `by`, given the winning source.
fn shadowed_by(fwd: &ForwardedOptions, winner: &FieldSource) -> Vec<&'static str> {
    shadowed(
        winner,
        fwd.forwarded_by_hostname,
        [
            ("forwardedByHeader", &fwd.forwarded_by_header),
            ("forwardedByStatic", &fwd.forwarded_by_static),
        ],
    )
}

fn shadowed_for(fwd: &ForwardedOptions, winner: &FieldSource) -> Vec<&'static str> {
    shadowed(
        winner,
        fwd.forwarded_for_remote,
        [
            ("forwardedForHeader", &fwd.forwarded_for_header),
            ("forwardedForStatic", &fwd.forwarded_for_static),
        ],
    )
}

fn shadowed(
    winner: &FieldSource,
    flag: bool,
    options: [(&'static str, &String); 2],
) -> Vec<&'static str> {
    let [(header_key, header), (static_key, literal)] = options;
    let header_set = !header.trim().is_empty();
    let static_set = !literal.trim().is_empty();
    match winner {
        FieldSource::HostIdentity | FieldSource::RemoteAddr if flag => [
            header_set.then_some(header_key),
            static_set.then_some(static_key),
        ]
        .into_iter()
        .flatten()
        .collect(),
        FieldSource::Header(_) if static_set => vec![static_key],
        _ => Vec::new(),
    }
}

fn describe_field(label: &str, winner: &FieldSource, ignored: &[&str]) -> String {
    if ignored.is_empty() {
        format!("    {label}: {}", winner.describe())
    } else {
        format!(
            "    {label}: {} (ignoring {})",
            winner.describe(),
            ignored.join(", ")
        )
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let fwd = &config.forwarded;
    let by = fwd.by_source();
    let for_ = fwd.for_source();

    let lines = [
        format!("  {} -> {}", config.name, config.upstream),
        format!("    timeout: {}ms", config.timeout),
        format!("    strip hop-by-hop: {}", config.strip_hop_by_hop),
        describe_field("by", &by, &shadowed_by(fwd, &by)),
        describe_field("for", &for_, &shadowed_for(fwd, &for_)),
    ];

    format!("{} is valid\n{}", path, lines.join("\n"))
}
