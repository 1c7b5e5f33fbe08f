use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use super::body_object;
use crate::common::entity_ids::{Category, CategoryId, Product, ProductId};
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::catalog;
use crate::kernel::store::{Document, Fields};
use crate::server::app::AppState;

fn parse_ref<T>(raw: &str, what: &str) -> Result<crate::common::Id<T>, ApiError> {
    raw.parse()
        .map_err(|err| ApiError::InvalidReference(format!("{what} id {raw:?}: {err}")))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Envelope<Document<Category>>, ApiError> {
    let fields = body_object(body)?;
    let category = catalog::categories(&state.db_pool).insert(fields).await?;
    Ok(Envelope::ok(category, "category created"))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<Category>>>, ApiError> {
    let all = catalog::categories(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "categories listed"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Value>, ApiError> {
    let id: CategoryId = parse_ref(&id, "category")?;
    let removed = catalog::categories(&state.db_pool).delete_by_id(&id).await?;
    if !removed {
        return Err(ApiError::ReferenceNotFound(format!(
            "no category with id {id}"
        )));
    }
    Ok(Envelope::ok(Value::Null, "category deleted"))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Vec<Document<Product>>>, ApiError> {
    let id: CategoryId = parse_ref(&id, "category")?;
    let matching = catalog::products_in_category(&state.db_pool, &id).await?;
    Ok(Envelope::ok(matching, "products listed by category"))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Envelope<Document<Product>>, ApiError> {
    let fields = body_object(body)?;
    let product = catalog::products(&state.db_pool).insert(fields).await?;
    Ok(Envelope::ok(product, "product created"))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<Product>>>, ApiError> {
    let all = catalog::products(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "products listed"))
}

pub async fn advertised_products(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<Product>>>, ApiError> {
    let mut filter = Fields::new();
    filter.insert("advertise".to_string(), Value::String("yes".to_string()));
    let matching = catalog::products(&state.db_pool).find(&filter).await?;
    Ok(Envelope::ok(matching, "advertised products listed"))
}

pub async fn products_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Envelope<Vec<Document<Product>>>, ApiError> {
    let mut filter = Fields::new();
    filter.insert("brand".to_string(), Value::String(brand.clone()));
    let matching = catalog::products(&state.db_pool).find(&filter).await?;
    Ok(Envelope::ok(matching, format!("products listed for brand {brand}")))
}

pub async fn products_by_seller(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Vec<Document<Product>>>, ApiError> {
    let mut filter = Fields::new();
    filter.insert("email".to_string(), Value::String(email.clone()));
    let matching = catalog::products(&state.db_pool).find(&filter).await?;
    Ok(Envelope::ok(matching, format!("products listed for {email}")))
}

pub async fn advertise_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Document<Product>>, ApiError> {
    let id: ProductId = parse_ref(&id, "product")?;
    let product = catalog::advertise(&state.db_pool, &id).await?;
    Ok(Envelope::ok(product, "product advertised"))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Value>, ApiError> {
    let id: ProductId = parse_ref(&id, "product")?;
    let removed = catalog::products(&state.db_pool).delete_by_id(&id).await?;
    if !removed {
        return Err(ApiError::ReferenceNotFound(format!(
            "no product with id {id}"
        )));
    }
    Ok(Envelope::ok(Value::Null, "product deleted"))
}
