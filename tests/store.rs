use checkin::store::{FileStore, KeyValueStore, StorageAddress, StorageBackend};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn file_store(tmp: &TempDir) -> KeyValueStore {
    KeyValueStore::new(Arc::new(FileStore::new(tmp.path().join("state/store.json"))))
}

#[test]
fn compound_write_keeps_rest_of_document() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    let container = StorageAddress::flat("box");
    assert!(store.set(&container, r#"{"keep":{"me":1},"users":[{"token":"old"}]}"#));

    let token = StorageAddress::compound("box", "users[0].token");
    assert!(store.set(&token, "new"));
    assert_eq!(store.get(&token).as_deref(), Some("new"));

    assert_eq!(
        store.get_value(&container),
        Some(json!({"keep": {"me": 1}, "users": [{"token": "new"}]}))
    );
}

#[test]
fn values_survive_reopening_the_file() {
    let tmp = TempDir::new().unwrap();
    let address: StorageAddress = "@box.settings.lang".parse().unwrap();
    assert!(file_store(&tmp).set(&address, "zh-cn"));

    let reopened = file_store(&tmp);
    assert_eq!(reopened.get(&address).as_deref(), Some("zh-cn"));
    assert_eq!(reopened.backend_name(), "file");
}

#[test]
fn malformed_container_reads_as_empty_and_is_replaced() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    assert!(store.set(&StorageAddress::flat("box"), "{not json"));

    let address = StorageAddress::compound("box", "a.b");
    assert_eq!(store.get(&address), None);
    assert!(store.set(&address, "1"));
    assert_eq!(
        store.get_value(&StorageAddress::flat("box")),
        Some(json!({"a": {"b": "1"}}))
    );
}

#[test]
fn non_string_leaves_come_back_as_json_text() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    let container = StorageAddress::flat("box");
    assert!(store.set_value(&container, json!({"n": 3, "flags": [true, null]})));

    assert_eq!(
        store.get(&StorageAddress::compound("box", "n")).as_deref(),
        Some("3")
    );
    assert_eq!(
        store.get(&StorageAddress::compound("box", "flags")).as_deref(),
        Some("[true,null]")
    );
    assert_eq!(store.get(&StorageAddress::compound("box", "flags[5]")), None);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Account {
    token: String,
    #[serde(rename = "userName")]
    user_name: String,
}

#[test]
fn typed_helpers_round_trip_records() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    let address = StorageAddress::compound("demo", "accounts");
    let accounts = vec![Account {
        token: "abc".into(),
        user_name: "u1".into(),
    }];

    store.set_json(&address, &accounts).unwrap();
    let loaded: Option<Vec<Account>> = store.get_json(&address).unwrap();
    assert_eq!(loaded, Some(accounts));
}

#[test]
fn file_backend_is_one_json_document() {
    let tmp = TempDir::new().unwrap();
    let backend = FileStore::new(tmp.path().join("store.json"));
    assert!(backend.write("a", "1"));
    assert!(backend.write("b", r#"{"x":1}"#));

    let raw = std::fs::read_to_string(tmp.path().join("store.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["a"], json!("1"));
    assert_eq!(backend.read("b").as_deref(), Some(r#"{"x":1}"#));
}
