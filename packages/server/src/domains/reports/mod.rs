//! Product reports: one live report per reporter, maintained by upsert.

use serde_json::Value;
use sqlx::PgPool;

use crate::common::entity_ids::{ProductId, ProductReport};
use crate::common::error::ApiError;
use crate::kernel::store::{Collection, Document, Fields};

pub fn collection(pool: &PgPool) -> Collection<ProductReport> {
    Collection::new(pool.clone(), "reports", &["reporter_email"])
}

/// File or refresh the report submitted by `reporter_email`. A product
/// reference in the body is format-checked before the write.
pub async fn file_report(
    pool: &PgPool,
    reporter_email: &str,
    fields: Fields,
) -> Result<Document<ProductReport>, ApiError> {
    if let Some(raw) = fields.get("product_id").and_then(Value::as_str) {
        raw.parse::<ProductId>()
            .map_err(|err| ApiError::InvalidReference(format!("product id {raw:?}: {err}")))?;
    }

    let mut fields = fields;
    fields.insert(
        "reporter_email".to_string(),
        Value::String(reporter_email.to_string()),
    );
    Ok(collection(pool).upsert_by_key(fields).await?)
}
