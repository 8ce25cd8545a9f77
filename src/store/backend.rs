use anyhow::{Context, bail};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Raw string storage behind the key-value store.
pub trait StorageBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    fn read(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`. Returns `false` when the backend refused
    /// or failed the write.
    fn write(&self, key: &str, value: &str) -> bool;
}

// ── In-memory ───────────────────────────────────────────────────

/// Namespaced in-memory map, used for unknown hosts and tests.
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}/{key}", self.namespace)
    }
}

impl StorageBackend for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.scoped(key))
            .cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.scoped(key), value.to_string());
        true
    }
}

// ── JSON document file ──────────────────────────────────────────

/// One JSON object on disk, read and rewritten wholesale on every access.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored document. Only a missing file counts as empty; an
    /// unreadable or malformed file is an error so it is never overwritten.
    fn load(&self) -> anyhow::Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed reading store file {}", self.path.display()));
            }
        };
        match serde_json::from_str::<Value>(&contents)
            .with_context(|| format!("store file {} is not valid JSON", self.path.display()))?
        {
            Value::Object(map) => Ok(map),
            _ => bail!("store file {} is not a JSON object", self.path.display()),
        }
    }
}

fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating store directory {}", parent.display()))?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .with_context(|| format!("failed writing store temp file {}", temp_path.display()))?;

    if let Err(rename_error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(rename_error)
            .with_context(|| format!("failed replacing store file {}", path.display()));
    }
    Ok(())
}

impl StorageBackend for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn read(&self, key: &str) -> Option<String> {
        let mut document = match self.load() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("{e:#}");
                return None;
            }
        };
        match document.remove(key)? {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn write(&self, key: &str, value: &str) -> bool {
        let mut document = match self.load() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("refusing to write `{key}`: {e:#}");
                return false;
            }
        };
        document.insert(key.to_string(), Value::String(value.to_string()));

        let result = serde_json::to_string_pretty(&Value::Object(document))
            .context("failed to serialize store document")
            .and_then(|serialized| write_atomic(&self.path, &serialized));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{e:#}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_namespaces_do_not_collide() {
        let a = MemoryStore::new("a");
        let b = MemoryStore::new("b");
        assert!(a.write("k", "1"));
        assert_eq!(a.read("k").as_deref(), Some("1"));
        assert_eq!(b.read("k"), None);
    }

    #[test]
    fn file_store_round_trips_and_keeps_other_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("store.json"));

        assert_eq!(store.read("missing"), None);
        assert!(store.write("one", "1"));
        assert!(store.write("two", "{\"x\":2}"));

        assert_eq!(store.read("one").as_deref(), Some("1"));
        assert_eq!(store.read("two").as_deref(), Some("{\"x\":2}"));
    }

    #[test]
    fn file_store_stringifies_non_string_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        fs::write(&path, r#"{"count": 3, "flags": {"on": true}, "gone": null}"#).unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.read("count").as_deref(), Some("3"));
        assert_eq!(store.read("flags").as_deref(), Some(r#"{"on":true}"#));
        assert_eq!(store.read("gone"), None);
    }

    #[test]
    fn file_store_never_overwrites_an_unparsable_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        fs::write(&path, r#"{"accounts": [{"token": "a"#).unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.read("k"), None);
        assert!(!store.write("k", "v"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"accounts": [{"token": "a"#
        );

        fs::write(&path, "[1, 2]").unwrap();
        assert!(!store.write("k", "v"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2]");
    }

    #[test]
    fn file_store_write_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let store = FileStore::new(&path);
        assert!(store.write("k", "v"));
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
