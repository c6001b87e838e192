//! JSON file persistence for settings and the leaderboard
//!
//! Saves write a sibling `.tmp` file and rename it into place.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to read or write a persisted file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a value from a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a value, falling back to its default when the file is missing or
/// unreadable. Failures other than a missing file are logged.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => value,
        Err(StorageError::Io(err)) if err.kind() == io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            log::warn!("Could not load {}: {}", path.display(), err);
            T::default()
        }
    }
}

/// Write a value as pretty JSON
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("nested").join("data.json");
        let mut value = BTreeMap::new();
        value.insert("wins".to_string(), 3u32);
        save_json(&path, &value).expect("save");
        let loaded: BTreeMap<String, u32> = load_json(&path).expect("load");
        assert_eq!(loaded, value);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_file_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("data.json");
        let loaded: Vec<u32> = load_or_default(&path);
        assert!(loaded.is_empty());
        assert!(matches!(load_json::<Vec<u32>>(&path), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("data.json");
        fs::write(&path, "{not json").expect("write");
        assert!(matches!(load_json::<Vec<u32>>(&path), Err(StorageError::Json(_))));
        let loaded: Vec<u32> = load_or_default(&path);
        assert!(loaded.is_empty());
    }
}
