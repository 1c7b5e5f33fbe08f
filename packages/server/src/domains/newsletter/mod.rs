//! Newsletter subscriptions: one record per email, maintained by upsert.

use serde_json::Value;
use sqlx::PgPool;

use crate::common::entity_ids::Subscription;
use crate::kernel::store::{Collection, Document, Fields, StoreError};

pub fn collection(pool: &PgPool) -> Collection<Subscription> {
    Collection::new(pool.clone(), "subscriptions", &["email"])
}

/// Subscribing twice converges on a single record.
pub async fn subscribe(
    pool: &PgPool,
    email: &str,
    fields: Fields,
) -> Result<Document<Subscription>, StoreError> {
    let mut fields = fields;
    fields.insert("email".to_string(), Value::String(email.to_string()));
    collection(pool).upsert_by_key(fields).await
}
