use crate::error::StoreError;
use crate::store::{KeyValueStore, StorageAddress};
use serde_json::{Map, Value};

const CREDENTIAL_FIELDS: [&str; 3] = ["token", "credential", "cookie"];
const NAME_FIELDS: [&str; 3] = ["userName", "username", "name"];

/// One stored account: an arbitrary JSON object owned by the site workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Position in the stored list, zero-based
    pub index: usize,
    pub record: Map<String, Value>,
}

impl Account {
    pub fn new(index: usize, record: Map<String, Value>) -> Self {
        Self { index, record }
    }

    /// First non-empty identifying credential.
    pub fn credential(&self) -> Option<&str> {
        self.first_str(&CREDENTIAL_FIELDS)
    }

    /// Display name, or `#<n>` (one-based) when the record carries none.
    pub fn display_name(&self) -> String {
        self.first_str(&NAME_FIELDS)
            .map_or_else(|| format!("#{}", self.index + 1), ToString::to_string)
    }

    fn first_str(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .filter_map(|f| self.record.get(*f).and_then(Value::as_str))
            .find(|v| !v.trim().is_empty())
    }
}

/// Load the account array stored at `address`. A missing entry is an empty list;
/// non-object entries are skipped.
pub fn load_accounts(
    store: &KeyValueStore,
    address: &StorageAddress,
) -> Result<Vec<Account>, StoreError> {
    let Some(value) = store.get_value(address) else {
        return Ok(Vec::new());
    };

    let Value::Array(items) = value else {
        return Err(StoreError::Malformed {
            key: address.to_string(),
            message: "expected a JSON array of account objects".into(),
        });
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(record) => Some(Account::new(index, record)),
            other => {
                tracing::warn!("skipping account #{} under {address}: not an object ({other})", index + 1);
                None
            }
        })
        .collect())
}

/// Write `records` back to `address` as a JSON array.
pub fn save_accounts(
    store: &KeyValueStore,
    address: &StorageAddress,
    records: &[Map<String, Value>],
) -> Result<(), StoreError> {
    store.set_json(address, &records)
}
