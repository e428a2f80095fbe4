use std::path::PathBuf;

use thiserror::Error;
use ticker_core::TickerError;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read ticker config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ticker config {origin}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid ticker config json {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "failed to parse ticker config {origin}: toml error: {toml_error}; json error: {json_error}"
    )]
    Unparseable {
        origin: String,
        toml_error: String,
        json_error: String,
    },
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidOverride {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to render ticker config as toml")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Invalid(#[from] TickerError),
}
