//! Serde data structures for the forwardmark configuration file.
//!
//! Contains [`Config`] (the root) and [`ForwardedOptions`] (the
//! annotator settings). All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing.

use serde::{Deserialize, Serialize};

use crate::middleware::FieldSource;

const fn default_timeout() -> u64 {
    5000
}

const fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "forwardmark".to_string()
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_default_name(v: &str) -> bool {
    v == "forwardmark"
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Instance name, used in logs only.
    #[serde(default = "default_name", skip_serializing_if = "is_default_name")]
    pub name: String,

    /// Base URL every request is forwarded to.
    pub upstream: String,

    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub strip_hop_by_hop: bool,

    #[serde(default, skip_serializing_if = "ForwardedOptions::is_default")]
    pub forwarded: ForwardedOptions,
}

impl Config {
    #[must_use]
    pub fn new(upstream: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            upstream: upstream.into(),
            timeout: default_timeout(),
            strip_hop_by_hop: default_true(),
            forwarded: ForwardedOptions::default(),
        }
    }
}

/// Where the `by` and `for` fields of `Forwarded` come from.
///
/// Keys are camelCase so existing plugin configuration files load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ForwardedOptions {
    #[serde(default, skip_serializing_if = "is_false")]
    pub forwarded_by_hostname: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub forwarded_by_header: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub forwarded_by_static: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub forwarded_for_remote: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub forwarded_for_header: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub forwarded_for_static: String,
}

impl ForwardedOptions {
    /// Source of the `by` field: hostname flag, then header, then static.
    #[must_use]
    pub fn by_source(&self) -> FieldSource {
        FieldSource::for_by(
            self.forwarded_by_hostname,
            &self.forwarded_by_header,
            &self.forwarded_by_static,
        )
    }

    /// Source of the `for` field: remote address flag, then header, then static.
    #[must_use]
    pub fn for_source(&self) -> FieldSource {
        FieldSource::for_for(
            self.forwarded_for_remote,
            &self.forwarded_for_header,
            &self.forwarded_for_static,
        )
    }

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
