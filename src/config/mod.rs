//! Configuration loading and validation.
//!
//! [`load_file`] reads a config file asynchronously, picks the parser
//! from the file extension via [`parse_config_str`], and validates the
//! result. Submodules provide the data model and validation logic.

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::ForwardmarkError;
use model::Config;

/// File names probed in the working directory when no `--config` is given.
pub const AUTO_DETECT_CANDIDATES: &[&str] = &[
    "forwardmark.yaml",
    "forwardmark.yml",
    "forwardmark.json",
    "forwardmark.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, ForwardmarkError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| ForwardmarkError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| ForwardmarkError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| ForwardmarkError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(ForwardmarkError::UnsupportedFormat(other.to_string())),
    }
}

/// Read, parse and validate a config file.
pub async fn load_file(path: &Path) -> Result<Config, ForwardmarkError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ForwardmarkError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ForwardmarkError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        return Err(ForwardmarkError::ConfigValidation { errors });
    }

    Ok(config)
}

/// Use `explicit` if given, otherwise the first auto-detect candidate that exists.
pub async fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ForwardmarkError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    for name in AUTO_DETECT_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return Ok(path);
        }
    }

    Err(ForwardmarkError::NoConfigSource {
        hint: "Provide --config <file>.\n  \
               Run 'forwardmark init' to create a config file."
            .into(),
    })
}
