use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use super::optional_body_object;
use crate::common::entity_ids::Subscription;
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::newsletter;
use crate::kernel::store::Document;
use crate::server::app::AppState;

pub async fn subscribe(
    State(state): State<AppState>,
    Path(email): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Envelope<Document<Subscription>>, ApiError> {
    let fields = optional_body_object(body.map(|Json(value)| value))?;
    let subscription = newsletter::subscribe(&state.db_pool, &email, fields).await?;
    Ok(Envelope::ok(subscription, "subscribed"))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<Subscription>>>, ApiError> {
    let all = newsletter::collection(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "subscriptions listed"))
}
