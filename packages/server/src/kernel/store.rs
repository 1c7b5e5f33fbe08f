//! Document store layer over Postgres JSONB.
//!
//! Each resource family lives in its own table of
//! `(id, doc jsonb, created_at, updated_at)` rows. A [`Collection`] is a
//! cheap cloneable handle on one such table, optionally configured with the
//! family's natural key (one or more top-level document fields backed by a
//! unique expression index).
//!
//! Every operation is a single SQL statement. In particular the upsert and
//! the conditional insert resolve their lookup-then-write step inside the
//! database via `ON CONFLICT`, so two concurrent identical requests for the
//! same key can never produce two records. Application code must not layer a
//! read-then-write sequence on top of these primitives for keyed writes.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use std::marker::PhantomData;
use thiserror::Error;

use crate::common::id::Id;

/// Top-level fields of one stored document.
pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Query(#[from] sqlx::Error),

    #[error("stored record has a malformed id: {0}")]
    CorruptId(String),

    #[error("write is missing natural key field '{0}'")]
    MissingKey(&'static str),

    #[error("collection has no natural key; keyed writes are not available")]
    NoNaturalKey,
}

/// One record of a collection.
#[derive(Debug, Clone)]
pub struct Document<T> {
    pub id: Id<T>,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Document<T> {
    /// Borrow a top-level string field, if present.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

// Documents serialize as `{"id": ..., ...fields}`, mirroring how they travel
// in response envelopes.
impl<T> Serialize for Document<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in &self.fields {
            if key != "id" {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

#[derive(sqlx::FromRow)]
struct DocRow {
    id: String,
    doc: Json<Fields>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocRow {
    fn into_document<T>(self) -> Result<Document<T>, StoreError> {
        let id = self
            .id
            .parse()
            .map_err(|_| StoreError::CorruptId(self.id.clone()))?;
        Ok(Document {
            id,
            fields: self.doc.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Handle on one resource family's table.
#[derive(Clone)]
pub struct Collection<T> {
    pool: PgPool,
    table: &'static str,
    natural_key: &'static [&'static str],
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T> {
    pub fn new(
        pool: PgPool,
        table: &'static str,
        natural_key: &'static [&'static str],
    ) -> Self {
        Self {
            pool,
            table,
            natural_key,
            _marker: PhantomData,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// `ON CONFLICT` target matching the family's unique expression index,
    /// e.g. `(doc->>'email'), (doc->>'product_id')`.
    fn conflict_target(&self) -> String {
        self.natural_key
            .iter()
            .map(|field| format!("(doc->>'{field}')"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Keyed writes require the natural key to be configured and present in
    /// the outgoing fields, otherwise the conflict clause cannot match.
    fn require_key(&self, fields: &Fields) -> Result<(), StoreError> {
        if self.natural_key.is_empty() {
            return Err(StoreError::NoNaturalKey);
        }
        for field in self.natural_key {
            if !fields.contains_key(*field) {
                return Err(StoreError::MissingKey(field));
            }
        }
        Ok(())
    }

    /// Insert a new record under a freshly generated id. Duplicate content is
    /// allowed; families with a natural key should use the keyed writes.
    pub async fn insert(&self, fields: Fields) -> Result<Document<T>, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) \
             RETURNING id, doc, created_at, updated_at",
            self.table
        );
        let row: DocRow = sqlx::query_as(&sql)
            .bind(Id::<T>::new().to_string())
            .bind(Json(fields))
            .fetch_one(&self.pool)
            .await?;
        row.into_document()
    }

    /// Conditionally insert a record keyed by the natural key. Returns
    /// `None` when a record with the same key already exists; no write is
    /// performed in that case. This is the dedup primitive for
    /// user-submitted relationships.
    pub async fn insert_unique(&self, fields: Fields) -> Result<Option<Document<T>>, StoreError> {
        self.require_key(&fields)?;
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) \
             ON CONFLICT ({}) DO NOTHING \
             RETURNING id, doc, created_at, updated_at",
            self.table,
            self.conflict_target()
        );
        let row: Option<DocRow> = sqlx::query_as(&sql)
            .bind(Id::<T>::new().to_string())
            .bind(Json(fields))
            .fetch_optional(&self.pool)
            .await?;
        row.map(DocRow::into_document).transpose()
    }

    /// Insert-or-merge keyed by the natural key (which must be present in
    /// `fields`). On conflict the named fields are merged over the stored
    /// document; fields not named survive untouched.
    pub async fn upsert_by_key(&self, fields: Fields) -> Result<Document<T>, StoreError> {
        self.require_key(&fields)?;
        let sql = format!(
            "INSERT INTO {table} (id, doc) VALUES ($1, $2) \
             ON CONFLICT ({target}) DO UPDATE \
             SET doc = {table}.doc || EXCLUDED.doc, updated_at = now() \
             RETURNING id, doc, created_at, updated_at",
            table = self.table,
            target = self.conflict_target()
        );
        let row: DocRow = sqlx::query_as(&sql)
            .bind(Id::<T>::new().to_string())
            .bind(Json(fields))
            .fetch_one(&self.pool)
            .await?;
        row.into_document()
    }

    /// Insert-or-merge keyed by primary key. Creates a record containing
    /// only `fields` when the id is absent.
    pub async fn upsert_by_id(&self, id: &Id<T>, fields: Fields) -> Result<Document<T>, StoreError> {
        let sql = format!(
            "INSERT INTO {table} (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET doc = {table}.doc || EXCLUDED.doc, updated_at = now() \
             RETURNING id, doc, created_at, updated_at",
            table = self.table
        );
        let row: DocRow = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(Json(fields))
            .fetch_one(&self.pool)
            .await?;
        row.into_document()
    }

    /// Exact-match merge: returns `None` (and writes nothing) when the id
    /// does not exist.
    pub async fn update_by_id(
        &self,
        id: &Id<T>,
        fields: Fields,
    ) -> Result<Option<Document<T>>, StoreError> {
        let sql = format!(
            "UPDATE {} SET doc = doc || $2, updated_at = now() WHERE id = $1 \
             RETURNING id, doc, created_at, updated_at",
            self.table
        );
        let row: Option<DocRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(Json(fields))
            .fetch_optional(&self.pool)
            .await?;
        row.map(DocRow::into_document).transpose()
    }

    /// Exact-match merge into the single record matching `filter`: returns
    /// `None` (and writes nothing) when no record matches.
    pub async fn update_one(
        &self,
        filter: &Fields,
        fields: Fields,
    ) -> Result<Option<Document<T>>, StoreError> {
        let sql = format!(
            "UPDATE {table} SET doc = doc || $2, updated_at = now() WHERE id = \
             (SELECT id FROM {table} WHERE doc @> $1 ORDER BY created_at, id LIMIT 1) \
             RETURNING id, doc, created_at, updated_at",
            table = self.table
        );
        let row: Option<DocRow> = sqlx::query_as(&sql)
            .bind(Json(filter.clone()))
            .bind(Json(fields))
            .fetch_optional(&self.pool)
            .await?;
        row.map(DocRow::into_document).transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<Document<T>>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} ORDER BY created_at, id",
            self.table
        );
        let rows: Vec<DocRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(DocRow::into_document).collect()
    }

    /// Fetch records whose documents contain all of `filter`'s fields
    /// (top-level equality).
    pub async fn find(&self, filter: &Fields) -> Result<Vec<Document<T>>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} WHERE doc @> $1 \
             ORDER BY created_at, id",
            self.table
        );
        let rows: Vec<DocRow> = sqlx::query_as(&sql)
            .bind(Json(filter.clone()))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(DocRow::into_document).collect()
    }

    pub async fn find_one(&self, filter: &Fields) -> Result<Option<Document<T>>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} WHERE doc @> $1 \
             ORDER BY created_at, id LIMIT 1",
            self.table
        );
        let row: Option<DocRow> = sqlx::query_as(&sql)
            .bind(Json(filter.clone()))
            .fetch_optional(&self.pool)
            .await?;
        row.map(DocRow::into_document).transpose()
    }

    pub async fn find_by_id(&self, id: &Id<T>) -> Result<Option<Document<T>>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} WHERE id = $1",
            self.table
        );
        let row: Option<DocRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(DocRow::into_document).transpose()
    }

    pub async fn delete_by_id(&self, id: &Id<T>) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the oldest record matching `filter`, if any.
    pub async fn delete_one(&self, filter: &Fields) -> Result<bool, StoreError> {
        let sql = format!(
            "DELETE FROM {table} WHERE id = \
             (SELECT id FROM {table} WHERE doc @> $1 ORDER BY created_at, id LIMIT 1)",
            table = self.table
        );
        let result = sqlx::query(&sql)
            .bind(Json(filter.clone()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Widget;

    // A lazy pool never connects; good enough for exercising the guard paths
    // that must fail before any query is issued.
    fn lazy_collection(natural_key: &'static [&'static str]) -> Collection<Widget> {
        let pool = PgPool::connect_lazy("postgres://localhost/never_connected")
            .expect("lazy pool options are valid");
        Collection::new(pool, "widgets", natural_key)
    }

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_conflict_target_single_field() {
        let collection = lazy_collection(&["email"]);
        assert_eq!(collection.conflict_target(), "(doc->>'email')");
    }

    #[tokio::test]
    async fn test_conflict_target_compound_key() {
        let collection = lazy_collection(&["email", "product_id"]);
        assert_eq!(
            collection.conflict_target(),
            "(doc->>'email'), (doc->>'product_id')"
        );
    }

    #[tokio::test]
    async fn test_upsert_requires_key_field() {
        let collection = lazy_collection(&["email"]);
        let err = collection
            .upsert_by_key(fields(json!({"name": "Sam"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingKey("email")));
    }

    #[tokio::test]
    async fn test_keyed_writes_rejected_without_natural_key() {
        let collection = lazy_collection(&[]);
        let err = collection
            .insert_unique(fields(json!({"email": "a@x.com"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NoNaturalKey));
    }

    #[test]
    fn test_document_serializes_id_first() {
        let doc = Document::<Widget> {
            id: Id::from_bytes([0xab; 12]),
            fields: fields(json!({"name": "Sam"})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], "abababababababababababab");
        assert_eq!(value["name"], "Sam");
    }
}
