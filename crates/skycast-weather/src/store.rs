//! Persistence of the last searched city.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "last_city.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LastCity {
    city: String,
    saved_at: DateTime<Utc>,
}

/// Single-value store in `{config_dir}/last_city.json`.
#[derive(Debug, Clone)]
pub struct LastCityStore {
    path: PathBuf,
}

impl LastCityStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved city, if any. Unreadable files count as empty.
    pub fn load(&self) -> Option<String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<LastCity>(&contents) {
            Ok(saved) if !saved.city.trim().is_empty() => Some(saved.city),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, city: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let record = LastCity {
            city: city.trim().to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)?;
        tracing::debug!("Saved last city '{}'", record.city);
        Ok(())
    }

    /// Remove the saved city. Missing file is not an error.
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastCityStore::new(dir.path());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastCityStore::new(&dir.path().join("nested"));
        store.save("  Khartoum ").unwrap();
        assert_eq!(store.load().as_deref(), Some("Khartoum"));

        store.save("Oslo").unwrap();
        assert_eq!(store.load().as_deref(), Some("Oslo"));
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastCityStore::new(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastCityStore::new(dir.path());
        store.clear().unwrap();
        store.save("Oslo").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }
}
