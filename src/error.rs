//! Error types for the simulation core and its configuration layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the session / front end.
#[derive(Error, Debug)]
pub enum GameError {
    /// A transition named a level that has no registered constructor.
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating a `GameConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
