//! HTTP API Client
//!
//! Request functions for the backend proxy. Every request carries the session
//! cookie (`credentials: include`).

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use web_sys::RequestCredentials;

use pipeline_dashboard::filters::OpportunityQuery;
use pipeline_dashboard::models::{
    AuthStatus, ErrorDetail, KpiSummary, OpportunityListResponse, PipelineData, PipelineResponse,
    StageData, StagesResponse,
};

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Backend base URL, fixed at build time by `PIPELINE_API_URL`
pub fn get_api_base() -> String {
    option_env!("PIPELINE_API_URL")
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

/// Where the login button sends the browser
pub fn login_url() -> String {
    format!("{}/auth/login", get_api_base())
}

pub async fn fetch_auth_status() -> Result<AuthStatus, String> {
    get_json(get("/auth/status")).await
}

/// End the session. The backend answers with a redirect, so any response counts.
pub async fn logout() -> Result<(), String> {
    Request::post(&format!("{}/auth/logout", get_api_base()))
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map(|_| ())
        .map_err(|e| format!("Network error: {}", e))
}

pub async fn fetch_kpis() -> Result<KpiSummary, String> {
    get_json(get("/api/dashboard/kpis")).await
}

pub async fn fetch_stages() -> Result<Vec<StageData>, String> {
    let response: StagesResponse = get_json(get("/api/dashboard/stages")).await?;
    Ok(response.stages)
}

pub async fn fetch_pipeline(months: u32) -> Result<Vec<PipelineData>, String> {
    let months = months.to_string();
    let request = get("/api/dashboard/pipeline").query([("months", months.as_str())]);
    let response: PipelineResponse = get_json(request).await?;
    Ok(response.pipeline)
}

pub async fn fetch_opportunities(query: &OpportunityQuery) -> Result<OpportunityListResponse, String> {
    let pairs = query.to_pairs();
    let request = get("/api/opportunities").query(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    get_json(request).await
}

fn get(path: &str) -> RequestBuilder {
    Request::get(&format!("{}{}", get_api_base(), path)).credentials(RequestCredentials::Include)
}

async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// `detail` from the error body, else the status line
async fn error_message(response: Response) -> String {
    let status = response.status();
    let status_text = response.status_text();

    match response.json::<ErrorDetail>().await {
        Ok(body) => body.detail,
        Err(_) => format!("HTTP {}: {}", status, status_text),
    }
}
