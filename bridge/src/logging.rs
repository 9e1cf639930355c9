//! Process-wide `tracing` setup.

use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, Result};

/// The filter directives in effect: the configured filter, else `RUST_LOG`,
/// else the configured level.
pub fn filter_directives(config: &LoggingConfig, rust_log: Option<String>) -> String {
  config
    .filter
    .clone()
    .or(rust_log.filter(|s| !s.trim().is_empty()))
    .unwrap_or_else(|| config.level.clone())
}

/// Installs the global subscriber and the `log` bridge. Output goes to
/// stderr; stdout carries port messages.
pub fn init(config: &LoggingConfig) -> Result<()> {
  config.level_filter()?;
  let directives = filter_directives(config, env::var("RUST_LOG").ok());
  let filter = EnvFilter::try_new(&directives).map_err(|e| Error::InvalidConfigValue {
    field: "logging.filter".to_string(),
    message: format!("'{}': {}", directives, e),
  })?;

  tracing_log::LogTracer::init().map_err(|e| Error::LoggingInit(e.to_string()))?;

  let fmt_layer = {
    let layer = tracing_subscriber::fmt::layer()
      .with_writer(std::io::stderr)
      .with_target(true);

    match config.format {
      LogFormat::Pretty => layer.pretty().boxed(),
      LogFormat::Compact => layer.compact().with_ansi(false).boxed(),
      LogFormat::Json => layer.json().boxed(),
    }
  }
  .with_filter(filter);

  let subscriber = tracing_subscriber::registry().with(fmt_layer);
  tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::LoggingInit(e.to_string()))?;

  tracing::debug!(filter = %directives, format = ?config.format, "logging initialized");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn explicit_filter_wins_over_rust_log_and_level() {
    let mut config = LoggingConfig::default();
    assert_eq!(filter_directives(&config, None), "info");
    assert_eq!(filter_directives(&config, Some("debug".into())), "debug");
    assert_eq!(filter_directives(&config, Some("  ".into())), "info");

    config.filter = Some("glyphport=trace".into());
    assert_eq!(filter_directives(&config, Some("debug".into())), "glyphport=trace");
  }
}
