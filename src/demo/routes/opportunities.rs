//! GET /api/opportunities
//!
//! Filtering, sorting and pagination over the demo dataset.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

use crate::demo::data::ListParams;
use crate::demo::error::{DemoError, DemoResult};
use crate::demo::state::DemoState;
use crate::models::OpportunityListResponse;

pub async fn list(
    State(state): State<Arc<DemoState>>,
    headers: HeaderMap,
    params: Result<Query<ListParams>, QueryRejection>,
) -> DemoResult<Json<OpportunityListResponse>> {
    state.require_session(&headers).await?;

    let Query(params) = params.map_err(|e| DemoError::Validation(e.body_text()))?;
    tracing::debug!(
        stage = ?params.stage,
        sort_by = %params.sort_by,
        limit = params.limit,
        offset = params.offset,
        "Listing opportunities"
    );

    Ok(Json(state.dataset.list(&params)?))
}
