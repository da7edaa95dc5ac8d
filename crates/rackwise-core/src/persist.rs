// ── Persistence backends ──
//
// The whole inventory is stored as one JSON document under a fixed
// storage name. There is no versioning or migration of the blob.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CoreError;
use crate::store::Inventory;

/// Default storage name for the persisted blob.
pub const DEFAULT_STORAGE_NAME: &str = "data-center-storage";

/// Where the store reads its initial state and writes every committed state.
pub trait StateBackend {
    /// Load the persisted inventory, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Inventory>, CoreError>;

    /// Persist a full inventory, replacing whatever was stored before.
    fn save(&mut self, inventory: &Inventory) -> Result<(), CoreError>;
}

// ── In-memory ────────────────────────────────────────────────────────

/// Keeps the serialized blob in memory. Used by tests and ephemeral stores.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    blob: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing serialized blob.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    /// The last saved blob.
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Inventory>, CoreError> {
        self.blob
            .as_deref()
            .map(serde_json::from_str::<Inventory>)
            .transpose()
            .map_err(CoreError::from)
    }

    fn save(&mut self, inventory: &Inventory) -> Result<(), CoreError> {
        self.blob = Some(serde_json::to_string(inventory)?);
        Ok(())
    }
}

// ── JSON file ────────────────────────────────────────────────────────

/// Persists to `<dir>/<storage_name>.json`, writing through a temp file and
/// renaming it into place.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl AsRef<Path>, storage_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{storage_name}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(message: String, source: std::io::Error) -> CoreError {
        CoreError::Persistence {
            message,
            source: Some(source),
        }
    }
}

impl StateBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Inventory>, CoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted inventory");
                return Ok(None);
            }
            Err(e) => {
                return Err(Self::io_error(
                    format!("failed to read {}", self.path.display()),
                    e,
                ));
            }
        };
        let inventory: Inventory = serde_json::from_str(&content)?;
        info!(path = %self.path.display(), "loaded persisted inventory");
        Ok(Some(inventory))
    }

    fn save(&mut self, inventory: &Inventory) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Self::io_error(format!("failed to create {}", parent.display()), e)
            })?;
        }
        let content = serde_json::to_string_pretty(inventory)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(|e| {
            Self::io_error(format!("failed to write {}", temp_path.display()), e)
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            Self::io_error(format!("failed to replace {}", self.path.display()), e)
        })?;
        debug!(path = %self.path.display(), "saved inventory");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_backend_round_trips_demo() {
        let mut backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_none());
        let demo = Inventory::demo();
        backend.save(&demo).unwrap();
        assert_eq!(backend.load().unwrap().unwrap(), demo);
    }

    #[test]
    fn blob_uses_original_top_level_keys() {
        let mut backend = MemoryBackend::new();
        backend.save(&Inventory::demo()).unwrap();
        let value: serde_json::Value = serde_json::from_str(backend.blob().unwrap()).unwrap();
        for key in ["dataCenters", "devices", "ipSubnets", "services"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["devices"].is_object());
        assert!(value["services"]["service-1"].is_object());
    }

    #[test]
    fn blob_without_optional_collections_loads() {
        let backend = MemoryBackend::with_blob(
            r#"{"dataCenters":[],"devices":{},"ipSubnets":[],"services":{}}"#,
        );
        let inventory = backend.load().unwrap().unwrap();
        assert!(inventory.reservations().is_empty());
        assert!(inventory.notifications().is_empty());
    }

    #[test]
    fn corrupt_blob_is_a_serialization_error() {
        let backend = MemoryBackend::with_blob("{not json");
        assert!(matches!(backend.load(), Err(CoreError::Serialization(_))));
    }

    #[test]
    fn file_backend_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path(), DEFAULT_STORAGE_NAME);
        assert!(backend.load().unwrap().is_none());
        assert!(backend.path().ends_with("data-center-storage.json"));
    }

    #[test]
    fn file_backend_creates_directory_and_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("nested"), "inv");
        backend.save(&Inventory::demo()).unwrap();
        backend.save(&Inventory::new()).unwrap();
        assert_eq!(backend.load().unwrap().unwrap(), Inventory::new());
        assert!(!dir.path().join("nested/inv.json.tmp").exists());
    }
}
