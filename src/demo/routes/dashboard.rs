//! Dashboard Aggregates
//!
//! - GET /api/dashboard/kpis
//! - GET /api/dashboard/stages
//! - GET /api/dashboard/pipeline?months=N

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::demo::error::{DemoError, DemoResult};
use crate::demo::state::DemoState;
use crate::models::{KpiSummary, PipelineResponse, StagesResponse};

#[derive(Debug, Deserialize)]
pub struct PipelineParams {
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    12
}

pub async fn kpis(
    State(state): State<Arc<DemoState>>,
    headers: HeaderMap,
) -> DemoResult<Json<KpiSummary>> {
    state.require_session(&headers).await?;
    Ok(Json(state.dataset.kpis()))
}

pub async fn stages(
    State(state): State<Arc<DemoState>>,
    headers: HeaderMap,
) -> DemoResult<Json<StagesResponse>> {
    state.require_session(&headers).await?;
    Ok(Json(StagesResponse {
        stages: state.dataset.stages(),
    }))
}

pub async fn pipeline(
    State(state): State<Arc<DemoState>>,
    headers: HeaderMap,
    params: Result<Query<PipelineParams>, QueryRejection>,
) -> DemoResult<Json<PipelineResponse>> {
    state.require_session(&headers).await?;

    let Query(params) = params.map_err(|e| DemoError::Validation(e.body_text()))?;
    Ok(Json(PipelineResponse {
        pipeline: state.dataset.pipeline(params.months),
    }))
}
