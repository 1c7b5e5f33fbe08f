//! Wishlist entries: owner/product relationship records.
//!
//! Adding an entry runs a fixed pipeline: identifier format check, product
//! existence check, then a conditional insert keyed by `(email, product_id)`.
//! A malformed id never reaches the store, and a duplicate submission is an
//! idempotent no-op rather than an error. The duplicate check itself happens
//! inside the insert's conflict clause, so concurrent identical requests
//! cannot create two records for the same pair.

use serde_json::Value;
use sqlx::PgPool;

use crate::common::entity_ids::{ProductId, WishlistEntry};
use crate::common::error::ApiError;
use crate::domains::catalog;
use crate::kernel::store::{Collection, Document, Fields, StoreError};

pub fn collection(pool: &PgPool) -> Collection<WishlistEntry> {
    Collection::new(pool.clone(), "wishlist", &["email", "product_id"])
}

/// Outcome of an add: either a fresh record or a no-op against an existing
/// one. Both are successes.
#[derive(Debug)]
pub enum AddOutcome {
    Created(Document<WishlistEntry>),
    AlreadyExists,
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|err| ApiError::InvalidReference(format!("product id {raw:?}: {err}")))
}

fn entry_key(email: &str, product_id: &ProductId) -> Fields {
    let mut key = Fields::new();
    key.insert("email".to_string(), Value::String(email.to_string()));
    key.insert(
        "product_id".to_string(),
        Value::String(product_id.to_string()),
    );
    key
}

/// Add `product_id` to `email`'s wishlist.
///
/// Check order is fixed: format, then product existence, then dedup. The
/// format check runs before any store lookup.
pub async fn add_entry(
    pool: &PgPool,
    email: &str,
    product_id: &str,
    extra: Fields,
) -> Result<AddOutcome, ApiError> {
    let product_id = parse_product_id(product_id)?;

    let product = catalog::products(pool).find_by_id(&product_id).await?;
    if product.is_none() {
        return Err(ApiError::ReferenceNotFound(format!(
            "no product with id {product_id}"
        )));
    }

    let mut fields = extra;
    fields.extend(entry_key(email, &product_id));

    match collection(pool).insert_unique(fields).await? {
        Some(entry) => Ok(AddOutcome::Created(entry)),
        None => Ok(AddOutcome::AlreadyExists),
    }
}

/// Merge fields into the entry for `(email, product_id)`, creating it when
/// absent. The product reference is format-checked but not resolved; this
/// path exists for annotating entries the owner already holds.
pub async fn update_entry(
    pool: &PgPool,
    email: &str,
    fields: Fields,
) -> Result<Document<WishlistEntry>, ApiError> {
    let raw_id = fields
        .get("product_id")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("wishlist update requires product_id".to_string()))?;
    let product_id = parse_product_id(raw_id)?;

    let mut fields = fields;
    fields.extend(entry_key(email, &product_id));
    Ok(collection(pool).upsert_by_key(fields).await?)
}

pub async fn remove_entry(pool: &PgPool, email: &str, product_id: &str) -> Result<bool, ApiError> {
    let product_id = parse_product_id(product_id)?;
    let removed = collection(pool)
        .delete_one(&entry_key(email, &product_id))
        .await?;
    Ok(removed)
}

pub async fn entries_for(
    pool: &PgPool,
    email: &str,
) -> Result<Vec<Document<WishlistEntry>>, StoreError> {
    let mut filter = Fields::new();
    filter.insert("email".to_string(), Value::String(email.to_string()));
    collection(pool).find(&filter).await
}
