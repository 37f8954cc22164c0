//! Schema-less document store seam.
//!
//! Collections hold JSON objects keyed by id. Backends answer point reads,
//! single-field equality queries, whole-document writes and top-level merge
//! updates. Nothing more: no transactions, no versioning.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::{Map, Value};
use std::fmt;
#[cfg(test)]
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
};

use crate::error::{StoreError, StoreResult};

const ID_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Developers,
    Recruiters,
    Investors,
    Ideas,
    Applications,
    InvestmentInterests,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Developers => "developers",
            Collection::Recruiters => "recruiters",
            Collection::Investors => "investors",
            Collection::Ideas => "ideas",
            Collection::Applications => "applications",
            Collection::InvestmentInterests => "investmentInterests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored document and its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

pub trait DocumentStore {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Documents for every id that exists, ordered by id, in one read.
    fn get_many(&self, collection: Collection, ids: &[&str]) -> StoreResult<Vec<Document>>;

    /// Documents whose top-level `field` equals `value`, ordered by id.
    fn find_by(&self, collection: Collection, field: &str, value: &Value)
    -> StoreResult<Vec<Document>>;

    /// Writes the whole document, replacing any existing one with the same id.
    fn put(&self, collection: Collection, id: &str, body: &Value) -> StoreResult<()>;

    /// Merges the top-level fields of `patch` into an existing document.
    fn update(&self, collection: Collection, id: &str, patch: &Value) -> StoreResult<()>;
}

/// Generates a random document id.
pub fn new_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub(crate) fn as_object(value: &Value) -> StoreResult<&Map<String, Value>> {
    value.as_object().ok_or(StoreError::NotAnObject)
}

pub(crate) fn merge_into(target: &mut Value, patch: &Map<String, Value>) -> StoreResult<()> {
    let Some(obj) = target.as_object_mut() else {
        return Err(StoreError::NotAnObject);
    };
    for (key, value) in patch {
        obj.insert(key.clone(), value.clone());
    }
    Ok(())
}

/// In-process backend for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RefCell<HashMap<Collection, BTreeMap<String, Value>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents of a collection, ordered by id.
    fn documents(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .borrow()
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, body)| Document {
                        id: id.clone(),
                        body: body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl DocumentStore for MemoryStore {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.borrow();
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|body| Document {
                id: id.to_string(),
                body: body.clone(),
            }))
    }

    fn get_many(&self, collection: Collection, ids: &[&str]) -> StoreResult<Vec<Document>> {
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|doc| ids.contains(&doc.id.as_str()))
            .collect())
    }

    fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|doc| doc.body.get(field) == Some(value))
            .collect())
    }

    fn put(&self, collection: Collection, id: &str, body: &Value) -> StoreResult<()> {
        as_object(body)?;
        self.collections
            .borrow_mut()
            .entry(collection)
            .or_default()
            .insert(id.to_string(), body.clone());
        Ok(())
    }

    fn update(&self, collection: Collection, id: &str, patch: &Value) -> StoreResult<()> {
        let patch = as_object(patch)?;
        let mut collections = self.collections.borrow_mut();
        let existing = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        merge_into(existing, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_id_is_alphanumeric() {
        let id = new_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, new_id());
    }

    #[test]
    fn test_memory_put_get_and_order() {
        let store = MemoryStore::new();
        store.put(Collection::Ideas, "b", &json!({"n": 2})).unwrap();
        store.put(Collection::Ideas, "a", &json!({"n": 1})).unwrap();

        let doc = store.get(Collection::Ideas, "a").unwrap().unwrap();
        assert_eq!(doc.body, json!({"n": 1}));
        assert!(store.get(Collection::Recruiters, "a").unwrap().is_none());

        let ids: Vec<String> = store
            .documents(Collection::Ideas)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_memory_get_many_skips_missing() {
        let store = MemoryStore::new();
        store.put(Collection::Developers, "u2", &json!({"n": 2})).unwrap();
        store.put(Collection::Developers, "u1", &json!({"n": 1})).unwrap();

        let ids: Vec<String> = store
            .get_many(Collection::Developers, &["u2", "u9", "u1"])
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["u1", "u2"]);
        assert!(store.get_many(Collection::Developers, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_memory_find_by_equality() {
        let store = MemoryStore::new();
        store
            .put(Collection::Applications, "1", &json!({"recruiter_id": "r1"}))
            .unwrap();
        store
            .put(Collection::Applications, "2", &json!({"recruiter_id": "r2"}))
            .unwrap();

        let found = store
            .find_by(Collection::Applications, "recruiter_id", &json!("r1"))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[test]
    fn test_memory_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store
            .put(Collection::Applications, "1", &json!({"status": "pending", "cover_letter": "hi"}))
            .unwrap();
        store
            .update(Collection::Applications, "1", &json!({"status": "accepted"}))
            .unwrap();

        let doc = store.get(Collection::Applications, "1").unwrap().unwrap();
        assert_eq!(doc.body, json!({"status": "accepted", "cover_letter": "hi"}));
    }

    #[test]
    fn test_memory_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(Collection::Applications, "nope", &json!({"status": "accepted"}))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_put_rejects_non_objects() {
        let store = MemoryStore::new();
        let err = store.put(Collection::Ideas, "x", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
    }
}
