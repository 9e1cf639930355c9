use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the `glyphport` bridge.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Configuration file not found: {0}")]
  ConfigNotFound(String),

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },

  #[error("Failed to initialize logging: {0}")]
  LoggingInit(String),

  #[error("Failed to build the font cache: {0}")]
  CacheBuild(#[from] glyphport_cache::BuildError),

  #[error("Storage file {path:?} could not be accessed: {source}")]
  Storage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Malformed JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("I/O failure on {context}: {source}")]
  Io {
    context: &'static str,
    #[source]
    source: std::io::Error,
  },

  #[error("Port '{0}' is closed")]
  PortClosed(&'static str),
}

/// A specialized `Result` type for `glyphport` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
