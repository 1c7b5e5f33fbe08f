use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use super::body_object;
use crate::common::entity_ids::ProductReport;
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::reports;
use crate::kernel::store::Document;
use crate::server::app::AppState;

pub async fn file(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<Value>,
) -> Result<Envelope<Document<ProductReport>>, ApiError> {
    let fields = body_object(body)?;
    let report = reports::file_report(&state.db_pool, &email, fields).await?;
    Ok(Envelope::ok(report, "report filed"))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<ProductReport>>>, ApiError> {
    let all = reports::collection(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "reports listed"))
}
