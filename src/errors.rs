//! Error types for the wrapper

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WrapperError>;

#[derive(Debug, Error)]
pub enum WrapperError {
    /// Command line did not carry a usable `--config` flag
    #[error("{0}")]
    Usage(String),

    /// Host configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collector config is not well-formed or has the wrong shape
    #[error("Schema error: {0}")]
    Schema(#[from] serde_yaml::Error),

    /// Neither a grpc nor an http OTLP receiver is configured
    #[error("can not find receiver configuration")]
    MissingReceiver,

    /// Neither an otlp nor an otlphttp exporter is configured
    #[error("can not find exporter configuration")]
    MissingExporter,

    /// Endpoint requires TLS, which the output section cannot express
    #[error("unsupported endpoint {endpoint:?}: {reason}")]
    UnsupportedEndpoint { endpoint: String, reason: &'static str },

    /// Endpoint is not in `host:port` form
    #[error("malformed endpoint {endpoint:?}: {reason}")]
    MalformedEndpoint { endpoint: String, reason: &'static str },

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent executable could not be found
    #[error("Error finding executable {path}: {reason}")]
    ExecResolution { path: PathBuf, reason: String },

    /// Replacing the process image failed
    #[error("Error executing {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WrapperError {
    pub(crate) fn malformed(endpoint: &str, reason: &'static str) -> Self {
        WrapperError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        }
    }
}
