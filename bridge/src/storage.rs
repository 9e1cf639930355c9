//! Key-value storage and its port relay.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::messages::{KeyList, Outbound, StorageValue};
use crate::ports::Outbox;

/// A persistent string-keyed store of JSON values.
pub trait KeyValueStore: Send {
  fn get(&self, key: &str) -> Option<Value>;

  fn set(&mut self, key: &str, value: Value) -> Result<()>;

  /// Returns the removed value, if any.
  fn remove(&mut self, key: &str) -> Result<Option<Value>>;

  fn clear(&mut self) -> Result<()>;

  /// Every stored pair, ordered by key.
  fn entries(&self) -> Vec<(String, Value)>;

  /// Stored keys starting with `prefix`, sorted.
  fn keys(&self, prefix: &str) -> Vec<String> {
    self
      .entries()
      .into_iter()
      .map(|(key, _)| key)
      .filter(|key| key.starts_with(prefix))
      .collect()
  }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
  fn get(&self, key: &str) -> Option<Value> {
    (**self).get(key)
  }

  fn set(&mut self, key: &str, value: Value) -> Result<()> {
    (**self).set(key, value)
  }

  fn remove(&mut self, key: &str) -> Result<Option<Value>> {
    (**self).remove(key)
  }

  fn clear(&mut self) -> Result<()> {
    (**self).clear()
  }

  fn entries(&self) -> Vec<(String, Value)> {
    (**self).entries()
  }

  fn keys(&self, prefix: &str) -> Vec<String> {
    (**self).keys(prefix)
  }
}

/// A store that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  map: BTreeMap<String, Value>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Option<Value> {
    self.map.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: Value) -> Result<()> {
    self.map.insert(key.to_string(), value);
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<Option<Value>> {
    Ok(self.map.remove(key))
  }

  fn clear(&mut self) -> Result<()> {
    self.map.clear();
    Ok(())
  }

  fn entries(&self) -> Vec<(String, Value)> {
    self.map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
  }

  fn keys(&self, prefix: &str) -> Vec<String> {
    self
      .map
      .range(prefix.to_string()..)
      .map(|(key, _)| key)
      .take_while(|key| key.starts_with(prefix))
      .cloned()
      .collect()
  }
}

/// A store backed by one JSON object file.
///
/// The whole map is rewritten on every mutation, through a sibling temporary
/// file renamed over the original. No fsync.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  memory: MemoryStore,
}

impl FileStore {
  /// Opens the store at `path`. A missing or empty file is an empty store.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();
    let map = match fs::read(&path) {
      Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
      Ok(bytes) => serde_json::from_slice(&bytes)?,
      Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
      Err(source) => return Err(Error::Storage { path, source }),
    };
    tracing::debug!(path = %path.display(), entries = map.len(), "storage opened");
    Ok(Self {
      path,
      memory: MemoryStore { map },
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn persist(&self) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&self.memory.map)?;
    let mut tmp = self.path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let storage_err = |source| Error::Storage {
      path: self.path.clone(),
      source,
    };
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(storage_err)?;
    }
    fs::write(&tmp, bytes).map_err(storage_err)?;
    fs::rename(&tmp, &self.path).map_err(storage_err)?;
    Ok(())
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> Option<Value> {
    self.memory.get(key)
  }

  fn set(&mut self, key: &str, value: Value) -> Result<()> {
    self.memory.set(key, value)?;
    self.persist()
  }

  fn remove(&mut self, key: &str) -> Result<Option<Value>> {
    let removed = self.memory.remove(key)?;
    if removed.is_some() {
      self.persist()?;
    }
    Ok(removed)
  }

  fn clear(&mut self) -> Result<()> {
    self.memory.clear()?;
    self.persist()
  }

  fn entries(&self) -> Vec<(String, Value)> {
    self.memory.entries()
  }

  fn keys(&self, prefix: &str) -> Vec<String> {
    self.memory.keys(prefix)
  }
}

/// Relays storage requests from the application to a [`KeyValueStore`].
pub struct StorageSync<S = Box<dyn KeyValueStore>> {
  store: S,
  outbox: Outbox,
}

impl<S: KeyValueStore> StorageSync<S> {
  pub fn new(store: S, outbox: Outbox) -> Self {
    Self { store, outbox }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Sends one `storageChanged` per stored pair so the application starts
  /// from the persisted state.
  pub fn subscribe(&self) -> Result<()> {
    let entries = self.store.entries();
    tracing::debug!(entries = entries.len(), "storage subscribed");
    for (key, value) in entries {
      self.outbox.send(Outbound::StorageChanged(StorageValue {
        key,
        value: Some(value),
      }))?;
    }
    Ok(())
  }

  pub fn get(&self, key: String) -> Result<()> {
    let value = self.store.get(&key);
    self.outbox.send(Outbound::StorageValue(StorageValue { key, value }))
  }

  pub fn set(&mut self, key: String, value: Value) -> Result<()> {
    self.store.set(&key, value.clone())?;
    self.outbox.send(Outbound::StorageChanged(StorageValue {
      key,
      value: Some(value),
    }))
  }

  pub fn remove(&mut self, key: String) -> Result<()> {
    self.store.remove(&key)?;
    self.outbox.send(Outbound::StorageChanged(StorageValue { key, value: None }))
  }

  pub fn clear(&mut self) -> Result<()> {
    self.store.clear()?;
    self.outbox.send(Outbound::StorageCleared)
  }

  pub fn keys(&self, prefix: String) -> Result<()> {
    let keys = self.store.keys(&prefix);
    self.outbox.send(Outbound::StorageKeyList(KeyList { prefix, keys }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn memory_keys_are_sorted_and_prefixed() {
    let mut store = MemoryStore::new();
    for key in ["doc.b", "doc.a", "docs", "app.theme"] {
      store.set(key, json!(1)).unwrap();
    }
    assert_eq!(store.keys("doc."), vec!["doc.a", "doc.b"]);
    assert_eq!(store.keys("").len(), 4);
    assert!(store.keys("zzz").is_empty());
  }

  #[test]
  fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut store = FileStore::open(&path).unwrap();
    store.set("theme", json!("dark")).unwrap();
    store.set("zoom", json!(1.5)).unwrap();
    assert_eq!(store.remove("zoom").unwrap(), Some(json!(1.5)));
    assert_eq!(store.remove("zoom").unwrap(), None);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.entries(), vec![("theme".to_string(), json!("dark"))]);
    assert!(!path.with_extension("json.tmp").exists());
  }

  #[test]
  fn file_store_rejects_a_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, "[1, 2").unwrap();
    assert!(matches!(FileStore::open(&path), Err(Error::Json(_))));

    fs::write(&path, "\n").unwrap();
    assert!(FileStore::open(&path).unwrap().entries().is_empty());
  }
}
