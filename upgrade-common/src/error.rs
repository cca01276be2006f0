//! Typed errors for the shared library

use std::path::PathBuf;
use thiserror::Error;

/// Failure loading the assistant configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown bus kind {0:?} (expected \"system\" or \"session\")")]
    UnknownBus(String),
}

/// Failure starting or feeding a worker
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to read event file {path}: {source}")]
    ReadEvents {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode event file {path}: {source}")]
    DecodeEvents {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
