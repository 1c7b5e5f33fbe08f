use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use super::body_object;
use crate::common::entity_ids::{Blog, BlogId};
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::blogs;
use crate::kernel::store::Document;
use crate::server::app::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Envelope<Document<Blog>>, ApiError> {
    let fields = body_object(body)?;
    let blog = blogs::collection(&state.db_pool).insert(fields).await?;
    Ok(Envelope::ok(blog, "blog post created"))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Document<Blog>>>, ApiError> {
    let all = blogs::collection(&state.db_pool).find_all().await?;
    Ok(Envelope::ok(all, "blog posts listed"))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Document<Blog>>, ApiError> {
    let id: BlogId = id
        .parse()
        .map_err(|err| ApiError::InvalidReference(format!("blog id {id:?}: {err}")))?;
    let blog = blogs::collection(&state.db_pool)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::ReferenceNotFound(format!("no blog post with id {id}")))?;
    Ok(Envelope::ok(blog, "blog post found"))
}
