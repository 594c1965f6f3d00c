//! Key-value preference persistence.
//!
//! Preferences are small string values (for example the serialized list of
//! open sidebar submenus) addressed by a namespaced key. The [`PreferenceStore`]
//! trait abstracts the backend so navigation state can be exercised without a
//! browser; three backends are provided:
//!
//! - [`JsonPreferenceStore`] writes a JSON document to the standard
//!   configuration directory (`~/.config/sidenav/preferences.json` on most
//!   platforms).
//! - [`InMemoryPreferenceStore`] keeps values in memory, optionally enforcing a
//!   per-value size quota.
//! - [`DisabledPreferenceStore`] rejects every call, modelling storage that the
//!   user or browser has turned off.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::path_processing::{config_file_path, expand_tilde};

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "SIDENAV_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The value does not fit in the space available to the store.
    #[error("preference '{key}' is {size} bytes, exceeding the {limit} byte quota")]
    QuotaExceeded { key: String, size: usize, limit: usize },
    /// The backend cannot be used at all.
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
}

/// Shared trait implemented by preference persistence backends.
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceStoreError>;

    /// Delete the value stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), PreferenceStoreError>;
}

/// Stored preference value with write metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPreference {
    pub value: String,
    /// Last time the value was written.
    #[serde(with = "ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    entries: IndexMap<String, StoredPreference>,
}

/// Preference store backed by a JSON file.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    payload: Mutex<PreferencesFile>,
}

impl JsonPreferenceStore {
    /// Create a store at the provided path (or the default path when omitted).
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, PreferenceStoreError> {
        let resolved_path = match path.into() {
            Some(path) => match path.to_str() {
                Some(text) => expand_tilde(text),
                None => path,
            },
            None => default_preferences_path(),
        };
        let payload = load_payload(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            payload: Mutex::new(payload),
        })
    }

    /// Initialize a store using the default location.
    pub fn with_defaults() -> Result<Self, PreferenceStoreError> {
        Self::new(None::<PathBuf>)
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record for `key`, including when it was last written.
    pub fn entry(&self, key: &str) -> Option<StoredPreference> {
        self.payload.lock().expect("preferences lock poisoned").entries.get(key).cloned()
    }

    fn save_locked(&self, payload: &PreferencesFile) -> Result<(), PreferenceStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceStoreError> {
        let payload = self.payload.lock().expect("preferences lock poisoned");
        Ok(payload.entries.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceStoreError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        let mut updated = payload.clone();
        updated.entries.insert(
            key.to_string(),
            StoredPreference {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        // Only a successful write becomes visible to `get`.
        self.save_locked(&updated)?;
        *payload = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceStoreError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        if !payload.entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = payload.clone();
        updated.entries.shift_remove(key);
        self.save_locked(&updated)?;
        *payload = updated;
        Ok(())
    }
}

/// In-memory preference store used for tests and as a fallback when the
/// configuration directory cannot be accessed.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<IndexMap<String, String>>,
    quota: Option<usize>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values longer than `limit` bytes, like a browser store that has
    /// run out of space.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota: Some(limit),
        }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceStoreError> {
        Ok(self.values.lock().expect("preferences lock poisoned").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceStoreError> {
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(PreferenceStoreError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit,
            });
        }
        self.values
            .lock()
            .expect("preferences lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceStoreError> {
        self.values.lock().expect("preferences lock poisoned").shift_remove(key);
        Ok(())
    }
}

/// Store standing in for disabled storage; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPreferenceStore;

impl DisabledPreferenceStore {
    fn unavailable() -> PreferenceStoreError {
        PreferenceStoreError::Unavailable("storage is disabled".to_string())
    }
}

impl PreferenceStore for DisabledPreferenceStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PreferenceStoreError> {
        Err(Self::unavailable())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceStoreError> {
        Err(Self::unavailable())
    }

    fn remove(&self, _key: &str) -> Result<(), PreferenceStoreError> {
        Err(Self::unavailable())
    }
}

fn default_preferences_path() -> PathBuf {
    config_file_path(PREFERENCES_PATH_ENV, PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesFile, PreferenceStoreError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesFile::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesFile::default()),
        Err(error) => Err(PreferenceStoreError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    const KEY: &str = "nav.sidebar.state";

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryPreferenceStore::new();
        assert!(store.get(KEY).unwrap().is_none());

        store.set(KEY, r#"["devices"]"#).unwrap();
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some(r#"["devices"]"#));

        store.remove(KEY).unwrap();
        assert!(store.get(KEY).unwrap().is_none());
    }

    #[test]
    fn quota_rejects_oversized_values_and_keeps_previous() {
        let store = InMemoryPreferenceStore::with_quota(8);
        store.set(KEY, "[]").unwrap();

        let error = store.set(KEY, r#"["devices","assignments"]"#).unwrap_err();
        assert!(matches!(error, PreferenceStoreError::QuotaExceeded { limit: 8, .. }));
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn disabled_store_fails_every_call() {
        let store = DisabledPreferenceStore;
        assert!(matches!(store.get(KEY), Err(PreferenceStoreError::Unavailable(_))));
        assert!(matches!(store.set(KEY, "[]"), Err(PreferenceStoreError::Unavailable(_))));
        assert!(store.remove(KEY).is_err());
    }

    #[test]
    fn json_store_persists_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let store = JsonPreferenceStore::new(Some(path.clone())).unwrap();
        store.set(KEY, r#"["assignments"]"#).unwrap();
        assert!(store.entry(KEY).is_some());

        drop(store);
        let reloaded = JsonPreferenceStore::new(Some(path)).unwrap();
        assert_eq!(reloaded.get(KEY).unwrap().as_deref(), Some(r#"["assignments"]"#));
    }

    #[test]
    fn json_store_remove_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = JsonPreferenceStore::new(Some(path.clone())).unwrap();
        store.set(KEY, "[]").unwrap();
        store.remove(KEY).unwrap();
        store.remove("never-written").unwrap();

        let reloaded = JsonPreferenceStore::new(Some(path)).unwrap();
        assert!(reloaded.get(KEY).unwrap().is_none());
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("cfg");
        let store = JsonPreferenceStore::new(Some(config_dir.join("preferences.json"))).unwrap();
        store.set(KEY, r#"["devices"]"#).unwrap();

        fs::remove_dir_all(&config_dir).unwrap();
        fs::write(&config_dir, "not a directory").unwrap();

        assert!(store.set(KEY, r#"["assignments"]"#).is_err());
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some(r#"["devices"]"#));

        assert!(store.remove(KEY).is_err());
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some(r#"["devices"]"#));
        assert_eq!(store.entry(KEY).unwrap().value, r#"["devices"]"#);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_path_is_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"prefs-\xff.json"));
        let store = JsonPreferenceStore::new(Some(path.clone())).unwrap();
        assert_eq!(store.path(), path.as_path());

        store.set(KEY, "[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn invalid_json_returns_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonPreferenceStore::new(Some(path)).unwrap();
        assert!(store.get(KEY).unwrap().is_none());
    }

    #[test]
    fn default_path_honors_env_override() {
        let override_path = "~/custom/preferences.json";
        temp_env::with_var(PREFERENCES_PATH_ENV, Some(override_path), || {
            assert_eq!(default_preferences_path(), expand_tilde(override_path));
        });
    }

    #[test]
    fn concurrent_writes_leave_a_valid_value() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonPreferenceStore::new(Some(dir.path().join("preferences.json"))).unwrap());
        let mut handles = Vec::new();
        for index in 0..5 {
            let handle_store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                handle_store.set(KEY, &format!("[\"menu-{index}\"]")).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let latest = store.get(KEY).unwrap().unwrap();
        assert!(latest.starts_with("[\"menu-"));
    }
}
