//! Demo Backend
//!
//! A local stand-in for the CRM backend proxy. It serves the same contract
//! from a generated dataset so the dashboard runs without CRM credentials.
//!
//! # Endpoints
//!
//! ## Auth
//! - `GET /auth/login` - Start a session, redirect to the frontend
//! - `GET /auth/status` - Session check
//! - `POST /auth/logout` - End the session
//!
//! ## Dashboard
//! - `GET /api/dashboard/kpis` - KPI summary
//! - `GET /api/dashboard/stages` - Open opportunities by stage
//! - `GET /api/dashboard/pipeline` - Monthly totals
//!
//! ## Opportunities
//! - `GET /api/opportunities` - Filtered, sorted, paginated listing
//!
//! ## Health
//! - `GET /health` - Liveness plus the demo flag
//!
//! # Example
//!
//! ```rust,no_run
//! use pipeline_dashboard::config::DemoConfig;
//! use pipeline_dashboard::demo::{serve, DemoState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DemoConfig::default();
//!     let state = DemoState::from_config(config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod routes;
pub mod state;

pub use data::{DemoDataset, DemoOpportunity, ListParams};
pub use error::{DemoError, DemoResult};
pub use state::DemoState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DemoConfig;

/// Build the demo router with all routes and middleware
pub fn build_router(state: DemoState) -> Router {
    let auth_routes = Router::new()
        .route("/login", get(routes::auth::login))
        .route("/status", get(routes::auth::status))
        .route("/logout", post(routes::auth::logout));

    let dashboard_routes = Router::new()
        .route("/kpis", get(routes::dashboard::kpis))
        .route("/stages", get(routes::dashboard::stages))
        .route("/pipeline", get(routes::dashboard::pipeline));

    let cors = cors_layer(&state.config.frontend_url);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/api/dashboard", dashboard_routes)
        .route("/api/opportunities", get(routes::opportunities::list))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Credentialed CORS for the one frontend origin
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid frontend URL; CORS disabled");
            cors
        }
    }
}

/// Start the demo backend on the configured address
pub async fn serve(state: DemoState, config: &DemoConfig) -> Result<(), DemoError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Demo backend listening on {}", addr);
    serve_listener(listener, state, shutdown_signal()).await?;
    tracing::info!("Demo backend shut down gracefully");
    Ok(())
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_listener(
    listener: TcpListener,
    state: DemoState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DemoError> {
    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| DemoError::Internal(format!("Server error: {}", e)))
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AuthStatus, ErrorDetail, HealthStatus, KpiSummary, OpportunityListResponse,
        PipelineResponse, StagesResponse,
    };
    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use chrono::NaiveDate;
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    fn create_test_app(require_session: bool) -> Router {
        let config = DemoConfig {
            require_session,
            records: 200,
            ..DemoConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        let dataset = DemoDataset::generate(config.seed, config.records, today);
        build_router(DemoState::new(dataset, config))
    }

    async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }
        app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_demo_mode() {
        let response = get(create_test_app(false), "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthStatus = json(response).await;
        assert_eq!(health.status, "ok");
        assert!(health.demo_mode);
    }

    #[tokio::test]
    async fn test_dashboard_endpoints() {
        let app = create_test_app(false);

        let kpis: KpiSummary = json(get(app.clone(), "/api/dashboard/kpis", None).await).await;
        assert!(kpis.open.count > 0);
        assert!(kpis.open.average.is_some());

        let stages: StagesResponse =
            json(get(app.clone(), "/api/dashboard/stages", None).await).await;
        let names: Vec<&str> = stages.stages.iter().map(|s| s.stage_name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(!names.iter().any(|n| n.starts_with("Closed")));

        let pipeline: PipelineResponse =
            json(get(app, "/api/dashboard/pipeline?months=6", None).await).await;
        let keys: Vec<(i32, u32)> = pipeline.pipeline.iter().map(|p| (p.year, p.month)).collect();
        let mut chronological = keys.clone();
        chronological.sort();
        assert_eq!(keys, chronological);
    }

    #[tokio::test]
    async fn test_opportunities_filtered_and_sorted() {
        let response = get(
            create_test_app(false),
            "/api/opportunities?stage=Closed%20Won&sort_by=Amount&limit=25&offset=0",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let page: OpportunityListResponse = json(response).await;
        assert_eq!(page.limit, 25);
        assert!(page.records.len() <= 25);
        assert!(page.records.iter().all(|r| r.stage_name == "Closed Won"));

        let amounts: Vec<f64> = page.records.iter().filter_map(|r| r.amount).collect();
        assert!(amounts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_invalid_listing_params_are_422() {
        let response = get(create_test_app(false), "/api/opportunities?limit=0", None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorDetail = json(response).await;
        assert!(body.detail.contains("limit"));

        let response = get(
            create_test_app(false),
            "/api/opportunities?min_amount=lots",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_pipeline_months_edge_cases() {
        let response = get(
            create_test_app(false),
            "/api/dashboard/pipeline?months=4000000",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let pipeline: PipelineResponse = json(response).await;
        assert_eq!(pipeline.pipeline.iter().map(|p| p.count).sum::<u64>(), 200);

        let response = get(
            create_test_app(false),
            "/api/dashboard/pipeline?months=abc",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorDetail = json(response).await;
        assert!(!body.detail.is_empty());
    }

    #[tokio::test]
    async fn test_session_required() {
        let app = create_test_app(true);

        let response = get(app.clone(), "/api/dashboard/kpis", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorDetail = json(response).await;
        assert_eq!(body.detail, "Not authenticated");

        let status: AuthStatus = json(get(app.clone(), "/auth/status", None).await).await;
        assert!(!status.authenticated);

        // Login hands out a cookie and redirects to the frontend
        let response = get(app.clone(), "/auth/login", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "http://localhost:3000"
        );
        let set_cookie = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=28800"));
        let cookie = set_cookie.split(';').next().unwrap().to_string();

        let status: AuthStatus = json(get(app.clone(), "/auth/status", Some(&cookie)).await).await;
        assert!(status.authenticated);
        let response = get(app.clone(), "/api/dashboard/kpis", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);

        // Logout forgets the session
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header("cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let status: AuthStatus = json(get(app, "/auth/status", Some(&cookie)).await).await;
        assert!(!status.authenticated);
    }

    #[tokio::test]
    async fn test_cors_allows_frontend_with_credentials() {
        let response = get_with_origin(create_test_app(false), "http://localhost:3000").await;
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .unwrap(),
            "true"
        );
    }

    async fn get_with_origin(app: Router, origin: &str) -> Response<Body> {
        app.oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }
}
