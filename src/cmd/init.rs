//! `forwardmark init` - generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::ForwardmarkError;

pub fn execute(args: &InitArgs) -> Result<(), ForwardmarkError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("forwardmark.{}", args.format.extension())));

    if output.exists() {
        return Err(ForwardmarkError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# forwardmark config

upstream: "http://localhost:8080"

forwarded:
  forwardedByHostname: true
  forwardedForRemote: true
"#;

const YAML_FULL: &str = r#"# forwardmark config
#
# Defaults are shown commented out. Uncomment and modify as needed.

# name: "forwardmark"            # Instance name, shown in logs
upstream: "http://localhost:8080" # Every request is forwarded here
# timeout: 5000                  # Upstream timeout in ms
# strip_hop_by_hop: true         # Strip Connection, TE, etc.

# Sources for the Forwarded header's `by` and `for` fields. For each field
# the first configured source wins, in the order listed below. `host` and
# `proto` are always taken from the request. Via is always appended as
# "<protocol> <hostname>", using "traefik" when the hostname is unknown.
forwarded:
  forwardedByHostname: true      # by = this machine's hostname
  # forwardedByHeader: ""        # by = value of this request header
  # forwardedByStatic: ""        # by = this literal
  forwardedForRemote: true       # for = client ip:port
  # forwardedForHeader: ""       # for = value of this request header
  # forwardedForStatic: ""       # for = this literal
"#;

const JSON_MINIMAL: &str = r#"{
  "upstream": "http://localhost:8080",
  "forwarded": {
    "forwardedByHostname": true,
    "forwardedForRemote": true
  }
}
"#;

const JSON_FULL: &str = r#"{
  "name": "forwardmark",
  "upstream": "http://localhost:8080",
  "timeout": 5000,
  "strip_hop_by_hop": true,
  "forwarded": {
    "forwardedByHostname": true,
    "forwardedByHeader": "",
    "forwardedByStatic": "",
    "forwardedForRemote": true,
    "forwardedForHeader": "",
    "forwardedForStatic": ""
  }
}
"#;

const TOML_MINIMAL: &str = r#"# forwardmark config

upstream = "http://localhost:8080"

[forwarded]
forwardedByHostname = true
forwardedForRemote = true
"#;

const TOML_FULL: &str = r#"# forwardmark config
#
# Defaults are shown commented out. Uncomment and modify as needed.

# name = "forwardmark"
upstream = "http://localhost:8080"
# timeout = 5000
# strip_hop_by_hop = true

# For each field the first configured source wins, in the order below.
[forwarded]
forwardedByHostname = true
# forwardedByHeader = ""
# forwardedByStatic = ""
forwardedForRemote = true
# forwardedForHeader = ""
# forwardedForStatic = ""
"#;
