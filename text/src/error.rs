use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when locating, reading or parsing a font.
#[derive(Debug, Error)]
pub enum FontError {
  #[error("invalid font name {name:?}: {reason}")]
  InvalidName { name: String, reason: &'static str },

  #[error("failed to read font file {path:?}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("font parse error: {0}")]
  Parse(String),
}
