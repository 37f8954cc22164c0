use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{as_object, merge_into, Collection, Document, DocumentStore};

/// SQLite-backed document store. Each row holds one JSON document.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_documents_recruiter
                ON documents(collection, json_extract(body, '$.recruiter_id'));
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='documents'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!(
                "Database not initialized. Run 'cofound init' first."
            ));
        }
        Ok(())
    }

    fn row_to_pair(row: &rusqlite::Row) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    fn decode(collection: Collection, rows: Vec<(String, String)>) -> StoreResult<Vec<Document>> {
        rows.into_iter()
            .map(|(id, body)| {
                let body = serde_json::from_str(&body).map_err(|source| StoreError::Malformed {
                    collection,
                    id: id.clone(),
                    source,
                })?;
                Ok(Document { id, body })
            })
            .collect()
    }
}

impl DocumentStore for Database {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let result = self.conn.query_row(
            "SELECT id, body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
            Self::row_to_pair,
        );
        match result {
            Ok(row) => Ok(Self::decode(collection, vec![row])?.pop()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_many(&self, collection: Collection, ids: &[&str]) -> StoreResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_list = serde_json::to_string(ids)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, body FROM documents
             WHERE collection = ?1 AND id IN (SELECT value FROM json_each(?2))
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![collection.name(), id_list], Self::row_to_pair)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(collection = %collection, requested = ids.len(), found = rows.len(), "get_many");
        Self::decode(collection, rows)
    }

    fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        // json_extract unwraps scalars, so compare against the unwrapped value
        let needle = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let path = format!("$.{}", field);
        let mut stmt = self.conn.prepare(
            "SELECT id, body FROM documents
             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map(
                params![collection.name(), path, needle],
                Self::row_to_pair,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(collection = %collection, field, matches = rows.len(), "find_by");
        Self::decode(collection, rows)
    }

    fn put(&self, collection: Collection, id: &str, body: &Value) -> StoreResult<()> {
        as_object(body)?;
        let encoded = serde_json::to_string(body)?;
        self.conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection, id)
             DO UPDATE SET body = excluded.body, updated_at = datetime('now')",
            params![collection.name(), id, encoded],
        )?;
        Ok(())
    }

    fn update(&self, collection: Collection, id: &str, patch: &Value) -> StoreResult<()> {
        let patch = as_object(patch)?;
        let mut doc = self.get(collection, id)?.ok_or_else(|| StoreError::NotFound {
            collection,
            id: id.to_string(),
        })?;
        merge_into(&mut doc.body, patch)?;
        let encoded = serde_json::to_string(&doc.body)?;
        self.conn.execute(
            "UPDATE documents SET body = ?1, updated_at = datetime('now')
             WHERE collection = ?2 AND id = ?3",
            params![encoded, collection.name(), id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_initialized_requires_init() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("nested/cofound.db")).unwrap();
        assert!(db.ensure_initialized().is_err());
        db.init().unwrap();
        db.ensure_initialized().unwrap();
    }

    #[test]
    fn test_put_then_get_round_trips_body() {
        let db = Database::open_in_memory().unwrap();
        let body = json!({"company_name": "Acme", "status": "active"});
        db.put(Collection::Ideas, "idea1", &body).unwrap();

        let doc = db.get(Collection::Ideas, "idea1").unwrap().unwrap();
        assert_eq!(doc.id, "idea1");
        assert_eq!(doc.body, body);
        assert!(db.get(Collection::Developers, "idea1").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_whole_document() {
        let db = Database::open_in_memory().unwrap();
        db.put(Collection::Developers, "u1", &json!({"a": 1, "b": 2})).unwrap();
        db.put(Collection::Developers, "u1", &json!({"a": 3})).unwrap();

        let doc = db.get(Collection::Developers, "u1").unwrap().unwrap();
        assert_eq!(doc.body, json!({"a": 3}));
    }

    #[test]
    fn test_find_by_matches_string_field() {
        let db = Database::open_in_memory().unwrap();
        db.put(Collection::Applications, "a1", &json!({"recruiter_id": "r1"})).unwrap();
        db.put(Collection::Applications, "a2", &json!({"recruiter_id": "r2"})).unwrap();
        db.put(Collection::Applications, "a3", &json!({"recruiter_id": "r1"})).unwrap();
        db.put(Collection::InvestmentInterests, "i1", &json!({"recruiter_id": "r1"})).unwrap();

        let ids: Vec<String> = db
            .find_by(Collection::Applications, "recruiter_id", &json!("r1"))
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a1", "a3"]);
    }

    #[test]
    fn test_update_merges_and_requires_existing() {
        let db = Database::open_in_memory().unwrap();
        db.put(Collection::Applications, "a1", &json!({"status": "pending", "resume": "r"})).unwrap();
        db.update(Collection::Applications, "a1", &json!({"status": "rejected"})).unwrap();

        let doc = db.get(Collection::Applications, "a1").unwrap().unwrap();
        assert_eq!(doc.body, json!({"status": "rejected", "resume": "r"}));

        let err = db
            .update(Collection::Applications, "missing", &json!({"status": "rejected"}))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_get_many_reads_requested_ids_only() {
        let db = Database::open_in_memory().unwrap();
        db.put(Collection::Developers, "u1", &json!({"first_name": "Ada"})).unwrap();
        db.put(Collection::Developers, "u2", &json!({"first_name": "Linus"})).unwrap();
        db.put(Collection::Developers, "u3", &json!({"first_name": "Grace"})).unwrap();
        db.put(Collection::Investors, "u1", &json!({"first_name": "Vera"})).unwrap();

        let docs = db
            .get_many(Collection::Developers, &["u3", "missing", "u1"])
            .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
        assert_eq!(docs[0].body, json!({"first_name": "Ada"}));
        assert!(db.get_many(Collection::Developers, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_recruiter_index_rejects_non_json_bodies() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .conn
            .execute(
                "INSERT INTO documents (collection, id, body) VALUES ('ideas', 'bad', 'not json')",
                [],
            )
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::SqliteFailure(..)));
        assert!(db.get(Collection::Ideas, "bad").unwrap().is_none());
    }

    #[test]
    fn test_malformed_body_is_reported() {
        let db = Database::open_in_memory().unwrap();
        // SQLite reads JSON5 (trailing comma), serde_json does not
        db.conn
            .execute(
                r#"INSERT INTO documents (collection, id, body)
                   VALUES ('ideas', 'bad', '{"recruiter_id": "r1",}')"#,
                [],
            )
            .unwrap();
        let err = db.get(Collection::Ideas, "bad").unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
