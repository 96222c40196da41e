//! GET /health

use axum::Json;

use crate::models::HealthStatus;

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        demo_mode: true,
    })
}
