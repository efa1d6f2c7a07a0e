//! Process-wide key/value scratch store shared by every request.
//!
//! One [`Store`] is created with the router and handed to each request
//! context as an `Arc<Store>`. Every operation takes the lock for its whole
//! duration, so operations are serialized and never observe a torn map.
//! Store methods must not be called from inside another store operation.


use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use serde_json::Value;

/// A mutex-guarded map from string keys to arbitrary JSON values.
#[derive(Debug, Default)]
pub struct Store {
    items: Mutex<HashMap<String, Value>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value stored under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.lock().insert(key.into(), value.into());
    }

    /// A copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.items.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.lock().contains_key(key)
    }

    /// Delete `key`, returning the value it held.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.items.lock().remove(key)
    }

    /// Drop every entry.
    pub fn purge(&self) {
        self.items.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// A key-ordered copy of the whole store, ready to be rendered as JSON.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.items
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
