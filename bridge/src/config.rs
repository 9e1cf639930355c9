//! YAML configuration for the bridge.

use std::env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};

const DEFAULT_CONFIG_BASE_NAME: &str = "glyphport";
const DEFAULT_CONFIG_EXTENSION: &str = "yaml";

// --- Top Level Config ---
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub fonts: FontsConfig,
  pub storage: StorageConfig,
  pub ports: PortsConfig,
  pub resize: ResizeConfig,
  pub logging: LoggingConfig,
}

// --- Fonts ---

fn default_font_directory() -> PathBuf {
  PathBuf::from("fonts")
}

fn default_font_extension() -> String {
  glyphport_text::source::DEFAULT_EXTENSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontsConfig {
  #[serde(default = "default_font_directory")]
  pub directory: PathBuf,
  #[serde(default = "default_font_extension")]
  pub extension: String,
}

impl Default for FontsConfig {
  fn default() -> Self {
    Self {
      directory: default_font_directory(),
      extension: default_font_extension(),
    }
  }
}

// --- Storage ---

/// Where stored key-value pairs live. Without a path they are kept in memory.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
  #[serde(default)]
  pub path: Option<PathBuf>,
}

// --- Ports ---

fn default_port_capacity() -> usize {
  256
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortsConfig {
  /// Capacity of each of the inbound and outbound channels.
  #[serde(default = "default_port_capacity")]
  pub capacity: usize,
}

impl Default for PortsConfig {
  fn default() -> Self {
    Self {
      capacity: default_port_capacity(),
    }
  }
}

// --- Resize ---

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResizeConfig {
  #[serde(default)]
  pub enabled: bool,
  /// Element ids to report. Empty reports every element the source sends.
  #[serde(default)]
  pub watch: Vec<String>,
}

// --- Logging ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  #[default]
  Pretty,
  Compact,
  Json,
}

fn default_log_level() -> String {
  "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,
  #[serde(default)]
  pub format: LogFormat,
  /// Full `EnvFilter` directives. Overrides `level` and `RUST_LOG`.
  #[serde(default)]
  pub filter: Option<String>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      format: LogFormat::default(),
      filter: None,
    }
  }
}

impl LoggingConfig {
  pub fn level_filter(&self) -> Result<LevelFilter> {
    LevelFilter::from_str(&self.level).map_err(|e| Error::InvalidConfigValue {
      field: "logging.level".to_string(),
      message: format!("'{}': {}", self.level, e),
    })
  }
}

impl Config {
  /// Parses and validates a configuration document.
  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let reader = io::BufReader::new(File::open(path)?);
    let config: Config =
      serde_yaml::from_reader(reader).map_err(|e| Error::ConfigParse(e.to_string()))?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
  }

  /// Loads `explicit` if given. Otherwise searches the working directory
  /// with [`find_config_file`] and falls back to the defaults when nothing is
  /// found.
  pub fn load(explicit: Option<&Path>, environment: Option<&str>) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::from_file(path);
    }
    match find_config_file(Path::new("."), environment) {
      Ok(path) => Self::from_file(&path),
      Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
      Err(e) => Err(e),
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.ports.capacity == 0 {
      return Err(Error::InvalidConfigValue {
        field: "ports.capacity".to_string(),
        message: "must be at least 1".to_string(),
      });
    }
    if self.fonts.extension.trim_start_matches('.').is_empty() {
      return Err(Error::InvalidConfigValue {
        field: "fonts.extension".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    self.logging.level_filter()?;
    Ok(())
  }
}

/// Finds the configuration file in `dir` based on an optional environment
/// suffix, taken from the argument or `GLYPHPORT_ENV` / `APP_ENV`.
///
/// `glyphport.<env>.yaml` is preferred over `glyphport.yaml`.
pub fn find_config_file(dir: &Path, environment_suffix: Option<&str>) -> Result<PathBuf> {
  let base_name = DEFAULT_CONFIG_BASE_NAME;
  let extension = DEFAULT_CONFIG_EXTENSION;

  let env_from_var = environment_suffix
    .map(|s| s.to_string())
    .or_else(|| env::var("GLYPHPORT_ENV").ok())
    .or_else(|| env::var("APP_ENV").ok());

  let mut files_to_check: Vec<String> = Vec::new();
  if let Some(env_str) = &env_from_var {
    if !env_str.is_empty() {
      files_to_check.push(format!("{}.{}.{}", base_name, env_str, extension));
    }
  }
  files_to_check.push(format!("{}.{}", base_name, extension));

  for file_name in &files_to_check {
    let path = dir.join(file_name);
    if path.is_file() {
      return Ok(path);
    }
  }

  Err(Error::ConfigNotFound(format!(
    "Searched for: {:?} in {:?}. Provide a config file or check GLYPHPORT_ENV/APP_ENV.",
    files_to_check, dir
  )))
}
