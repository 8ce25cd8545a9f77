pub mod address;
pub mod backend;
pub mod path;

pub use address::StorageAddress;
pub use backend::{FileStore, MemoryStore, StorageBackend};

use crate::error::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Key-value store with flat and compound (`container.path`) addressing.
///
/// Compound writes are read-modify-write against the container document and
/// are not atomic with respect to other writers of the same container.
#[derive(Clone)]
pub struct KeyValueStore {
    backend: Arc<dyn StorageBackend>,
}

impl KeyValueStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Read the string at `address`. String leaves come back as-is; any other
    /// JSON leaf comes back as its JSON text.
    pub fn get(&self, address: &StorageAddress) -> Option<String> {
        match address {
            StorageAddress::Flat(key) => self.backend.read(key),
            StorageAddress::Compound { .. } => match self.get_value(address)? {
                Value::String(text) => Some(text),
                other => Some(other.to_string()),
            },
        }
    }

    /// Write a string at `address`. Returns `false` if the backend write failed.
    pub fn set(&self, address: &StorageAddress, value: &str) -> bool {
        match address {
            StorageAddress::Flat(key) => self.backend.write(key, value),
            StorageAddress::Compound { .. } => {
                self.set_value(address, Value::String(value.to_string()))
            }
        }
    }

    /// Read the JSON value at `address`. Flat entries are parsed as JSON,
    /// falling back to a JSON string when they are not valid JSON.
    pub fn get_value(&self, address: &StorageAddress) -> Option<Value> {
        match address {
            StorageAddress::Flat(key) => {
                let raw = self.backend.read(key)?;
                Some(serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
            }
            StorageAddress::Compound { container, path } => {
                let document = self.load_container(container);
                path::resolve(&document, path).cloned()
            }
        }
    }

    /// Write a JSON value at `address`. Flat entries store its JSON text
    /// (strings are stored raw).
    pub fn set_value(&self, address: &StorageAddress, value: Value) -> bool {
        match address {
            StorageAddress::Flat(key) => {
                let text = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                self.backend.write(key, &text)
            }
            StorageAddress::Compound { container, path } => {
                let mut document = self.load_container(container);
                if !path::assign(&mut document, path, value) {
                    tracing::warn!("refusing write to @{container}.{path}: index out of range");
                    return false;
                }
                self.backend.write(container, &document.to_string())
            }
        }
    }

    /// Deserialize the value at `address`. `Ok(None)` means not found.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        address: &StorageAddress,
    ) -> Result<Option<T>, StoreError> {
        let Some(value) = self.get_value(address) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: address.to_string(),
                message: e.to_string(),
            })
    }

    pub fn set_json<T: Serialize>(
        &self,
        address: &StorageAddress,
        value: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        if self.set_value(address, value) {
            Ok(())
        } else {
            Err(StoreError::WriteRejected {
                key: address.backend_key().to_string(),
            })
        }
    }

    /// The container document, or an empty object when it is missing,
    /// malformed, or not a JSON container.
    fn load_container(&self, container: &str) -> Value {
        let Some(raw) = self.backend.read(container) else {
            return Value::Object(Map::new());
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
            Ok(_) => Value::Object(Map::new()),
            Err(e) => {
                tracing::debug!("container `{container}` is not valid JSON ({e}); using {{}}");
                Value::Object(Map::new())
            }
        }
    }
}
