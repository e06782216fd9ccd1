//! Persisted session state
//!
//! History, the memory register and preferences are saved as one JSON
//! snapshot. Persistence is best-effort: the session logs store failures
//! and carries on with its in-memory state.

use calcpro_common::StorageSettings;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

use crate::error::{CalcError, Result};
use crate::history::History;

/// User preferences kept alongside the calculation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Index into the colour theme list
    pub theme: usize,
    pub dark_mode: bool,
    pub sound_enabled: bool,
    /// Set once the welcome screen has been shown
    pub visited: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: 0,
            dark_mode: true,
            sound_enabled: false,
            visited: false,
        }
    }
}

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub history: History,
    /// Written as `null` by JSON when non-finite, read back as 0
    #[serde(deserialize_with = "finite_or_zero")]
    pub memory: f64,
    pub preferences: Preferences,
}

fn finite_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Storage backend for session snapshots and history exports
pub trait SessionStore: Send + Sync {
    /// Load the last saved snapshot, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Store a plain-text history export under `file_name`
    fn save_export(&self, file_name: &str, contents: &str) -> Result<()>;
}

/// Open the store described by the storage settings
pub fn open_store(settings: &StorageSettings) -> Box<dyn SessionStore> {
    if settings.enabled {
        Box::new(FileSessionStore::new(
            settings.state_path(),
            settings.export_dir.clone(),
        ))
    } else {
        Box::new(NullSessionStore)
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    state_path: PathBuf,
    export_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(state_path: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            export_dir: export_dir.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| {
                CalcError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })
        },
        _ => Ok(()),
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.state_path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.state_path)?;
        let mut snapshot: Snapshot = serde_json::from_slice(&data).map_err(|e| {
            CalcError::storage(format!(
                "Failed to parse {}: {}",
                self.state_path.display(),
                e
            ))
        })?;
        snapshot.history.trim();
        debug!(path = %self.state_path.display(), entries = snapshot.history.len(), "state loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        ensure_parent(&self.state_path)?;
        let data = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.state_path, data)?;
        debug!(path = %self.state_path.display(), "state saved");
        Ok(())
    }

    fn save_export(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.export_dir.join(file_name);
        ensure_parent(&path)?;
        fs::write(&path, contents)?;
        debug!(path = %path.display(), "history exported");
        Ok(())
    }
}

/// In-memory store for testing and embedding
#[derive(Default)]
pub struct MemorySessionStore {
    snapshot: RwLock<Option<Snapshot>>,
    exports: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a previously saved export
    pub fn export(&self, file_name: &str) -> Option<String> {
        self.exports
            .read()
            .ok()
            .and_then(|exports| exports.get(file_name).cloned())
    }
}

fn poisoned<T>(_: T) -> CalcError {
    CalcError::storage("State lock poisoned")
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.read().map_err(poisoned)?.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.write().map_err(poisoned)? = Some(snapshot.clone());
        Ok(())
    }

    fn save_export(&self, file_name: &str, contents: &str) -> Result<()> {
        self.exports
            .write()
            .map_err(poisoned)?
            .insert(file_name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Null store - persistence disabled
pub struct NullSessionStore;

impl SessionStore for NullSessionStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(None)
    }

    fn save(&self, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }

    fn save_export(&self, _file_name: &str, _contents: &str) -> Result<()> {
        Ok(())
    }
}
