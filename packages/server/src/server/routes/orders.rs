use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use super::body_object;
use crate::common::entity_ids::Order;
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::orders;
use crate::kernel::store::{Document, Fields};
use crate::server::app::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Envelope<Document<Order>>, ApiError> {
    let fields = body_object(body)?;
    let order = orders::collection(&state.db_pool).insert(fields).await?;
    Ok(Envelope::ok(order, "order placed"))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<Order>>>, ApiError> {
    let all = orders::collection(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "orders listed"))
}

pub async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Vec<Document<Order>>>, ApiError> {
    let mut filter = Fields::new();
    filter.insert("email".to_string(), Value::String(email.clone()));
    let matching = orders::collection(&state.db_pool).find(&filter).await?;
    Ok(Envelope::ok(matching, format!("orders listed for {email}")))
}
