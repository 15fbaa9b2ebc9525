use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use taskdeck_core::{KeyValueStore, StorageError};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const STORE_FILE: &str = "session.json";

/// Key/value store kept as one JSON object on disk, rewritten atomically
/// on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;
        let path = data_dir.join(STORE_FILE);

        let entries = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)
                    .with_context(|| format!("failed parsing {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        info!(file = %path.display(), keys = entries.len(), "opened store");
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    fn flush(&self) -> Result<(), StorageError> {
        save_atomic(&self.path, &self.entries.borrow())
            .map_err(|err| StorageError(format!("{err:#}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed { self.flush() } else { Ok(()) }
    }
}

fn save_atomic(path: &Path, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
    debug!(file = %path.display(), keys = entries.len(), "saving store atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, entries)?;
    writeln!(temp)?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
