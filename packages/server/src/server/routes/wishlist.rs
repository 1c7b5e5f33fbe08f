use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::{body_object, optional_body_object};
use crate::common::entity_ids::WishlistEntry;
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::wishlist::{self, AddOutcome};
use crate::kernel::store::Document;
use crate::server::app::AppState;

/// Add a product to the caller's wishlist. Duplicate submissions succeed
/// without writing; the outcome field tells the two cases apart.
pub async fn add(
    State(state): State<AppState>,
    Path((email, product_id)): Path<(String, String)>,
    body: Option<Json<Value>>,
) -> Result<Envelope<Value>, ApiError> {
    let extra = optional_body_object(body.map(|Json(value)| value))?;

    let outcome = wishlist::add_entry(&state.db_pool, &email, &product_id, extra).await?;
    let envelope = match outcome {
        AddOutcome::Created(entry) => Envelope::ok(
            json!({"outcome": "created", "entry": entry}),
            "product added to wishlist",
        ),
        AddOutcome::AlreadyExists => Envelope::ok(
            json!({"outcome": "already_exists"}),
            "product already in wishlist",
        ),
    };
    Ok(envelope)
}

pub async fn update(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<Value>,
) -> Result<Envelope<Document<WishlistEntry>>, ApiError> {
    let fields = body_object(body)?;
    let entry = wishlist::update_entry(&state.db_pool, &email, fields).await?;
    Ok(Envelope::ok(entry, "wishlist entry updated"))
}

pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<WishlistEntry>>>, ApiError> {
    let all = wishlist::collection(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "wishlist entries listed"))
}

pub async fn list_for_owner(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Vec<Document<WishlistEntry>>>, ApiError> {
    let entries = wishlist::entries_for(&state.db_pool, &email).await?;
    Ok(Envelope::ok(
        entries,
        format!("wishlist entries listed for {email}"),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((email, product_id)): Path<(String, String)>,
) -> Result<Envelope<Value>, ApiError> {
    let removed = wishlist::remove_entry(&state.db_pool, &email, &product_id).await?;
    if !removed {
        return Err(ApiError::ReferenceNotFound(
            "no matching wishlist entry".to_string(),
        ));
    }
    Ok(Envelope::ok(Value::Null, "wishlist entry deleted"))
}
