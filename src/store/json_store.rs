use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

/// JSON documents in one directory, written atomically (tmp file + rename).
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Load a document, falling back to `T::default()` when the file is
    /// absent or cannot be parsed.
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding unreadable store file");
                    T::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read store file");
                T::default()
            }
        }
    }

    pub fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("preptime")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = make_test_store();
        let mut data: BTreeMap<String, u32> = BTreeMap::new();
        data.insert("a".into(), 1);
        store.save("doc.json", &data).unwrap();
        let loaded: BTreeMap<String, u32> = store.load("doc.json");
        assert_eq!(loaded, data);
        assert!(!store.file_path("doc.tmp").exists());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (_dir, store) = make_test_store();
        let loaded: BTreeMap<String, u32> = store.load("absent.json");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path("doc.json"), "{ not json").unwrap();
        let loaded: BTreeMap<String, u32> = store.load("doc.json");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = make_test_store();
        store.save("doc.json", &1u32).unwrap();
        store.remove("doc.json").unwrap();
        store.remove("doc.json").unwrap();
        assert!(!store.file_path("doc.json").exists());
    }
}
