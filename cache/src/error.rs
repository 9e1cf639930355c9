use std::fmt;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// `tokio_spawner()` was requested but the builder was not called from
  /// within a Tokio runtime.
  NoTokioRuntime,
  /// `tokio_spawner()` was requested but the `tokio` feature is disabled.
  TokioFeatureDisabled,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::NoTokioRuntime => write!(
        f,
        "a tokio spawner was requested outside of a tokio runtime"
      ),
      BuildError::TokioFeatureDisabled => write!(
        f,
        "a tokio spawner requires the 'tokio' feature"
      ),
    }
  }
}

impl std::error::Error for BuildError {}
