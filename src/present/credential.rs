// Credential state and its durable key-value slot

use super::error::CredentialError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage key of the playground credential
pub const CREDENTIAL_STORAGE_KEY: &str = "jatti.apiKey";

/// Durable key-value storage, touched only at the UI boundary
pub trait CredentialStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, CredentialError>;
    fn save(&self, key: &str, value: &str) -> Result<(), CredentialError>;
    fn remove(&self, key: &str) -> Result<(), CredentialError>;
}

/// JSON file holding a flat string map
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.jatti/storage.json`
    pub fn default_location() -> Self {
        let path = dirs::home_dir()
            .map(|p| p.join(".jatti").join("storage.json"))
            .unwrap_or_else(|| PathBuf::from(".jatti/storage.json"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), CredentialError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), entries = entries.len(), "persisted storage");
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// The playground credential.
///
/// Writers: the startup load and `set` (the user editing the field).
/// Requests read it through `header_value` at call time.
pub struct Credential {
    value: String,
    store: Box<dyn CredentialStore>,
}

impl Credential {
    /// Load the last-known credential; a broken store starts empty
    pub fn load(store: Box<dyn CredentialStore>) -> Self {
        let value = match store.load(CREDENTIAL_STORAGE_KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "failed to load stored credential");
                String::new()
            }
        };
        debug!(present = !value.is_empty(), "credential loaded");
        Self { value, store }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Overwrite the credential and mirror it to storage; empty clears the slot
    pub fn set(&mut self, value: impl Into<String>) -> Result<(), CredentialError> {
        self.value = value.into();
        if self.value.is_empty() {
            info!("credential cleared");
            self.store.remove(CREDENTIAL_STORAGE_KEY)
        } else {
            info!("credential updated");
            self.store.save(CREDENTIAL_STORAGE_KEY, &self.value)
        }
    }

    /// Use a value for this session only, leaving storage untouched
    pub fn set_for_session(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Value to attach to a request, only when non-blank
    pub fn header_value(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("present", &!self.value.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut credential = Credential::load(Box::new(FileCredentialStore::new(&path)));
        assert_eq!(credential.value(), "");
        assert_eq!(credential.header_value(), None);

        credential.set("demo-key").unwrap();
        let reloaded = Credential::load(Box::new(FileCredentialStore::new(&path)));
        assert_eq!(reloaded.value(), "demo-key");
        assert_eq!(reloaded.header_value().as_deref(), Some("demo-key"));
    }

    #[test]
    fn test_empty_value_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = FileCredentialStore::new(&path);
        store.save("other", "kept").unwrap();

        let mut credential = Credential::load(Box::new(store.clone()));
        credential.set("demo-key").unwrap();
        credential.set("").unwrap();

        assert_eq!(store.load(CREDENTIAL_STORAGE_KEY).unwrap(), None);
        assert_eq!(store.load("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_session_value_overrides_stored() {
        let store = MemoryCredentialStore::default();
        store.save(CREDENTIAL_STORAGE_KEY, "stored").unwrap();

        let mut credential = Credential::load(Box::new(store));
        assert_eq!(credential.value(), "stored");
        credential.set_for_session("from-env");
        assert_eq!(credential.header_value().as_deref(), Some("from-env"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let credential = Credential::load(Box::new(FileCredentialStore::new(&path)));
        assert_eq!(credential.value(), "");
    }
}
