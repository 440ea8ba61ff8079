//! Reciter registry (`custom-reciters.json`)
//!
//! The registry is a top-level JSON array of reciter objects, unique by
//! `name`. It is always handled as a whole: load, modify in memory, save.
//! Saving writes a sibling temp file and renames it over the target so a
//! failed write never leaves a truncated registry behind.
//!
//! Objects already in the file are kept as raw JSON and written back as they
//! were read, whether or not they parse as a [`CatalogEntry`]. Other tools
//! and older versions write this file too.

use crate::catalog::CatalogEntry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Asks the user whether an existing entry may be replaced
pub trait Confirm {
    /// Return `Ok(true)` to replace, `Ok(false)` to keep the existing entry
    fn confirm(&mut self, prompt: &str) -> std::io::Result<bool>;
}

/// Result of [`Registry::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry with that name existed
    Added,
    /// An existing entry was removed and the new one appended
    Replaced,
    /// The user declined; the registry is unchanged
    Declined,
}

/// One element of the registry array
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredItem {
    /// Entry added during this run
    Entry(CatalogEntry),
    /// Element read from disk, written back untouched
    Stored(Value),
}

impl StoredItem {
    /// The `name` the item is keyed by, if it has one
    pub fn name(&self) -> Option<&str> {
        match self {
            StoredItem::Entry(entry) => Some(&entry.name),
            StoredItem::Stored(value) => value.get("name").and_then(Value::as_str),
        }
    }

    /// The item as a catalog entry, or None if it is not in a shape this
    /// tool understands
    pub fn to_entry(&self) -> Option<CatalogEntry> {
        match self {
            StoredItem::Entry(entry) => Some(entry.clone()),
            StoredItem::Stored(value) => CatalogEntry::deserialize(value).ok(),
        }
    }
}

/// In-memory registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    items: Vec<StoredItem>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry. A file that is not a JSON
    /// array is an error, so it is never silently overwritten.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} not found, will create new file", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let registry = Self::from_json(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let unrecognized = registry
            .items
            .iter()
            .filter(|item| item.to_entry().is_none())
            .count();
        if unrecognized > 0 {
            debug!(
                "{} of {} items in {} are not reciter entries; keeping them as-is",
                unrecognized,
                registry.items.len(),
                path.display()
            );
        }

        debug!(
            "Loaded {} items from {}",
            registry.items.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Parse registry JSON; anything but a top-level array is rejected
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        let values: Vec<Value> = serde_json::from_str(content)?;
        Ok(Self {
            items: values.into_iter().map(StoredItem::Stored).collect(),
        })
    }

    /// Serialize with 2-space indentation, non-ASCII kept literal
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(&self.items)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the whole registry to `path` atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let save_error = |reason: String| Error::Save {
            path: path.to_path_buf(),
            reason,
        };

        let json = self.to_json().map_err(|e| save_error(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_error(e.to_string()))?;
        }

        let temp_path = temp_path_for(path);
        if let Err(e) = std::fs::write(&temp_path, json) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(save_error(e.to_string()));
        }

        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(save_error(e.to_string()));
        }

        info!("Saved {} items to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Every item in file order
    pub fn items(&self) -> &[StoredItem] {
        &self.items
    }

    /// Items that parse as catalog entries, in file order
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.items.iter().filter_map(StoredItem::to_entry).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entry called `name`, if present and readable as a catalog entry
    pub fn get(&self, name: &str) -> Option<CatalogEntry> {
        self.items
            .iter()
            .find(|item| item.name() == Some(name))
            .and_then(StoredItem::to_entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name() == Some(name))
    }

    /// Remove every item called `name`; returns how many were removed
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.name() != Some(name));
        before - self.items.len()
    }

    /// Add `entry`, asking `confirm` before replacing an existing one.
    ///
    /// A replaced entry is removed and the new one appended at the end.
    pub fn upsert(&mut self, entry: CatalogEntry, confirm: &mut dyn Confirm) -> Result<UpsertOutcome> {
        if !self.contains(&entry.name) {
            self.items.push(StoredItem::Entry(entry));
            return Ok(UpsertOutcome::Added);
        }

        let prompt = format!("Reciter '{}' already exists in the file", entry.name);
        if !confirm.confirm(&prompt)? {
            return Ok(UpsertOutcome::Declined);
        }

        self.remove(&entry.name);
        self.items.push(StoredItem::Entry(entry));
        Ok(UpsertOutcome::Replaced)
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
