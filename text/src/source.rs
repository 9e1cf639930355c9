//! Locating font files by name.

use std::path::{Path, PathBuf};

use crate::error::FontError;
use crate::font::Font;

/// The file extension fonts are stored under.
pub const DEFAULT_EXTENSION: &str = "ttf";

/// Checks that `name` can be used as a file stem inside a font directory.
pub fn validate_font_name(name: &str) -> Result<(), FontError> {
  let invalid = |reason| FontError::InvalidName {
    name: name.to_string(),
    reason,
  };

  if name.trim().is_empty() {
    return Err(invalid("name is empty"));
  }
  if name.contains(['/', '\\']) {
    return Err(invalid("name contains a path separator"));
  }
  if name.contains("..") {
    return Err(invalid("name contains '..'"));
  }
  if name.chars().any(char::is_control) {
    return Err(invalid("name contains a control character"));
  }
  Ok(())
}

/// A directory of font files named `<font name>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDirectory {
  root: PathBuf,
  extension: String,
}

impl FontDirectory {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      extension: DEFAULT_EXTENSION.to_string(),
    }
  }

  pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
    self.extension = extension.into().trim_start_matches('.').to_string();
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn extension(&self) -> &str {
    &self.extension
  }

  /// The path the font `name` is expected at.
  pub fn path_for(&self, name: &str) -> Result<PathBuf, FontError> {
    validate_font_name(name)?;
    Ok(self.root.join(format!("{}.{}", name, self.extension)))
  }

  /// Reads and parses the font `name`. Blocking.
  pub fn load(&self, name: &str) -> Result<Font, FontError> {
    let path = self.path_for(name)?;
    let bytes = std::fs::read(&path).map_err(|source| FontError::Io {
      path: path.clone(),
      source,
    })?;
    let font = Font::from_vec(bytes)?;
    tracing::debug!(
      font = name,
      path = %path.display(),
      family = font.family_name().unwrap_or("<unnamed>"),
      "font parsed"
    );
    Ok(font)
  }

  /// Font names available in the directory, sorted.
  pub fn available(&self) -> Result<Vec<String>, FontError> {
    let entries = std::fs::read_dir(&self.root).map_err(|source| FontError::Io {
      path: self.root.clone(),
      source,
    })?;

    let mut names: Vec<String> = entries
      .filter_map(|entry| entry.ok())
      .map(|entry| entry.path())
      .filter(|path| {
        path
          .extension()
          .and_then(|ext| ext.to_str())
          .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
      })
      .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
      .collect();
    names.sort();
    Ok(names)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn font_names_cannot_escape_the_directory() {
    for name in ["", "  ", "../etc/passwd", "fonts/arial", "a\\b", "x\u{0}"] {
      assert!(validate_font_name(name).is_err(), "{:?} should be rejected", name);
    }
    assert!(validate_font_name("Open Sans-Bold").is_ok());
  }

  #[test]
  fn path_uses_the_configured_extension() {
    let dir = FontDirectory::new("/srv/fonts").with_extension(".otf");
    assert_eq!(
      dir.path_for("arial").unwrap(),
      PathBuf::from("/srv/fonts/arial.otf")
    );
  }

  #[test]
  fn load_reports_missing_and_unparseable_files() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("broken.ttf"), b"not a font").unwrap();
    let dir = FontDirectory::new(tmp.path());

    assert!(matches!(dir.load("missing"), Err(FontError::Io { .. })));
    assert!(matches!(dir.load("broken"), Err(FontError::Parse(_))));
    assert!(matches!(dir.load("../broken"), Err(FontError::InvalidName { .. })));
  }

  #[test]
  fn available_lists_matching_stems() {
    let tmp = tempfile::tempdir().unwrap();
    for file in ["b.ttf", "a.TTF", "notes.txt"] {
      std::fs::write(tmp.path().join(file), b"").unwrap();
    }
    let dir = FontDirectory::new(tmp.path());
    assert_eq!(dir.available().unwrap(), vec!["a".to_string(), "b".to_string()]);
  }
}
