use tracing::warn;

use crate::storage::{
  KeyValueStore,
  THEME_KEY
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum Theme {
  #[default]
  Light,
  Dark
}

impl Theme {
  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn from_storage(
    raw: Option<&str>
  ) -> Self {
    match raw {
      | Some("dark") => Self::Dark,
      | _ => Self::Light
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  pub fn is_dark(self) -> bool {
    self == Self::Dark
  }

  pub fn toggle_label(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "Dark mode",
      | Self::Dark => "Light mode"
    }
  }

  pub fn load(
    store: &impl KeyValueStore
  ) -> Self {
    Self::from_storage(
      store.get(THEME_KEY).as_deref()
    )
  }

  pub fn save(
    self,
    store: &impl KeyValueStore
  ) {
    if let Err(error) = store.set(
      THEME_KEY,
      self.storage_value()
    ) {
      warn!(
        %error,
        theme = self.storage_value(),
        "failed to persist theme"
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  #[test]
  fn unknown_values_read_as_light() {
    assert_eq!(
      Theme::from_storage(None),
      Theme::Light
    );
    assert_eq!(
      Theme::from_storage(Some("night")),
      Theme::Light
    );
    assert_eq!(
      Theme::from_storage(Some("dark")),
      Theme::Dark
    );
  }

  #[test]
  fn save_then_load() {
    let store = MemoryStore::new();
    Theme::Dark.save(&store);
    assert_eq!(
      store.get(THEME_KEY).as_deref(),
      Some("dark")
    );
    assert_eq!(
      Theme::load(&store),
      Theme::Dark
    );
  }
}
