//! forwardmark stamps proxied HTTP requests with `Forwarded` and `Via`.
//!
//! The core is a Tower layer, [`middleware::ForwardedHeadersLayer`], that
//! fills in the `by`, `for`, `host` and `proto` fields of an RFC 7239
//! `Forwarded` element, appends it to any existing `Forwarded` chain,
//! appends a `Via` hop, and then calls the next service. It can wrap any
//! `tower::Service` taking an `http::Request`. The crate also ships a small
//! binary that serves the layer in front of a single upstream.
//!
//! # Architecture
//!
//! - [`middleware`] -- The annotation layer, its `by`/`for` sources, and
//!   the replaceable host identity lookup.
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Configuration loading and validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Upstream forwarding and hop-by-hop header handling.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Public functions are mostly consumed by the binary.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
