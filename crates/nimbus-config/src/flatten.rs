use crate::access;
use crate::model::{Checksum, ConfigMap};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// One fetch of the remote document, flattened to dot-delimited keys.
/// Nested objects become `parent.child`, array elements `list.0`, `list.1`.
/// Scalars keep their JSON text form without quotes; null is the empty
/// string. Replaced wholesale on reload, never merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatSnapshot {
    entries: BTreeMap<String, String>,
    checksum: Checksum,
}

impl FlatSnapshot {
    pub fn empty() -> Self {
        Self::from_entries(BTreeMap::new())
    }

    pub fn from_document(root: &ConfigMap) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in root {
            visit(key.clone(), value, &mut entries);
        }
        Self::from_entries(entries)
    }

    fn from_entries(entries: BTreeMap<String, String>) -> Self {
        let mut hasher = Sha256::new();
        for (key, value) in &entries {
            hasher.update(key.as_bytes());
            hasher.update([0u8]);
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        }
        let checksum = Checksum(STANDARD_NO_PAD.encode(hasher.finalize()));
        Self { entries, checksum }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expands the flat entries back into a nested map, so remote keys read
    /// identically to a locally loaded JSON document.
    pub fn to_nested(&self) -> ConfigMap {
        let mut map = ConfigMap::new();
        for (key, value) in &self.entries {
            access::set_path(&mut map, key, Value::String(value.clone()));
        }
        map
    }
}

fn visit(prefix: String, value: &Value, entries: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                visit(format!("{prefix}.{key}"), child, entries);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                visit(format!("{prefix}.{index}"), child, entries);
            }
        }
        Value::Null => {
            entries.insert(prefix, String::new());
        }
        Value::String(s) => {
            entries.insert(prefix, s.clone());
        }
        other => {
            entries.insert(prefix, other.to_string());
        }
    }
}
