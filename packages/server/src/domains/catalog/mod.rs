//! Categories and products.
//!
//! Both are insert-only families: every create produces a new record under a
//! fresh id. Products carry the list-filter fields (`email` for the seller,
//! `brand`, `category_id`, `advertise`).

use serde_json::Value;
use sqlx::PgPool;

use crate::common::entity_ids::{Category, CategoryId, Product, ProductId};
use crate::common::error::ApiError;
use crate::kernel::store::{Collection, Document, Fields};

pub fn categories(pool: &PgPool) -> Collection<Category> {
    Collection::new(pool.clone(), "categories", &[])
}

pub fn products(pool: &PgPool) -> Collection<Product> {
    Collection::new(pool.clone(), "products", &[])
}

/// Products filed under a category.
pub async fn products_in_category(
    pool: &PgPool,
    category_id: &CategoryId,
) -> Result<Vec<Document<Product>>, ApiError> {
    let mut filter = Fields::new();
    filter.insert(
        "category_id".to_string(),
        Value::String(category_id.to_string()),
    );
    Ok(products(pool).find(&filter).await?)
}

/// Flag a product for the advertised carousel. Exact update: advertising an
/// id nobody listed is a not-found error, not a new record.
pub async fn advertise(pool: &PgPool, id: &ProductId) -> Result<Document<Product>, ApiError> {
    let mut fields = Fields::new();
    fields.insert("advertise".to_string(), Value::String("yes".to_string()));
    products(pool)
        .update_by_id(id, fields)
        .await?
        .ok_or_else(|| ApiError::ReferenceNotFound(format!("no product with id {id}")))
}
