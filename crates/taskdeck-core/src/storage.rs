use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::StorageError;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the display theme.
pub const THEME_KEY: &str = "theme";

/// Durable client-side key/value
/// storage (browser `localStorage`, a
/// file on disk, or memory in tests).
pub trait KeyValueStore {
  fn get(&self, key: &str) -> Option<String>;

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError>;

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore
  for &S
{
  fn get(&self, key: &str) -> Option<String> {
    (**self).get(key)
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    (**self).set(key, value)
  }

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError> {
    (**self).remove(key)
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: RefCell<BTreeMap<String, String>>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entries<I, K, V>(
    entries: I
  ) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>
  {
    Self {
      entries: RefCell::new(
        entries
          .into_iter()
          .map(|(k, v)| {
            (k.into(), v.into())
          })
          .collect()
      )
    }
  }

  pub fn snapshot(
    &self
  ) -> BTreeMap<String, String> {
    self.entries.borrow().clone()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.borrow().get(key).cloned()
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    self.entries.borrow_mut().insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError> {
    self.entries.borrow_mut().remove(key);
    Ok(())
  }
}
