//! Backend Proxy Client
//!
//! Typed requests against the CRM backend proxy. Credentials travel as the
//! backend's `session_id` cookie, held by an explicit [`Session`]; callers
//! never see tokens. One request per call: no retries, no caching.

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{redirect, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::filters::OpportunityQuery;
use crate::models::{
    AuthStatus, ErrorDetail, HealthStatus, KpiSummary, OpportunityListResponse, PipelineData,
    PipelineResponse, StageData, StagesResponse,
};

/// Cookie the backend keys sessions on
pub const SESSION_COOKIE: &str = "session_id";

/// Cookie jar shared by every request of one client
#[derive(Clone, Default)]
pub struct Session {
    jar: Arc<Jar>,
}

impl Session {
    /// A session with no cookies; the backend will answer unauthenticated
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the session with an existing `session_id` value for `base_url`
    pub fn with_cookie(base_url: &str, value: &str) -> Result<Self, ClientError> {
        let url = parse_base_url(base_url)?;
        let session = Self::new();
        session
            .jar
            .add_cookie_str(&format!("{}={}; Path=/", SESSION_COOKIE, value), &url);
        Ok(session)
    }

    /// Session seeded from `api.session_cookie` when present
    pub fn from_config(config: &ApiConfig) -> Self {
        let Some(value) = config.session_cookie.as_deref() else {
            return Self::new();
        };

        match Self::with_cookie(&config.base_url, value) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring configured session cookie");
                Self::new()
            }
        }
    }

    /// Current `session_id` value the jar would send to `base_url`
    pub fn cookie(&self, base_url: &Url) -> Option<String> {
        let header = self.jar.cookies(base_url)?;
        let header = header.to_str().ok()?;

        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.to_string())
        })
    }

    fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: backend unavailable")]
    Unavailable,

    #[error("Network error: request timed out")]
    Timeout,

    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Request(e)
        }
    }
}

/// What pages need from the backend
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Where a browser goes to sign in
    fn login_url(&self) -> String;

    async fn auth_status(&self) -> Result<AuthStatus, ClientError>;

    async fn kpis(&self) -> Result<KpiSummary, ClientError>;

    async fn stages(&self) -> Result<Vec<StageData>, ClientError>;

    async fn pipeline(&self, months: u32) -> Result<Vec<PipelineData>, ClientError>;

    async fn opportunities(
        &self,
        query: &OpportunityQuery,
    ) -> Result<OpportunityListResponse, ClientError>;
}

/// HTTP client for the backend proxy
#[derive(Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: Url,
    session: Session,
}

impl DashboardClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;

        // Login and logout answer with redirects meant for a browser
        let client = Client::builder()
            .cookie_provider(session.jar())
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Session cookie currently held for this backend
    pub fn session_cookie(&self) -> Option<String> {
        self.session.cookie(&self.base_url)
    }

    /// The backend's OAuth entry point
    pub fn login_url(&self) -> String {
        self.endpoint("/auth/login")
    }

    /// Start the login flow and return where the backend redirects to.
    ///
    /// Any cookie set along the way lands in the session.
    pub async fn begin_login(&self) -> Result<String, ClientError> {
        let path = "/auth/login";
        tracing::debug!(endpoint = path, "GET");

        let response = self.client.get(self.endpoint(path)).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| ClientError::Decode("redirect without a location".to_string()))?;

            // Relative redirects resolve against the backend
            let target = self
                .base_url
                .join(location)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| location.to_string());
            return Ok(target);
        }

        if status.is_success() {
            return Err(ClientError::Decode(format!(
                "expected a redirect from {}, got {}",
                path, status
            )));
        }

        Err(error_from_response(path, response).await)
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ClientError> {
        self.get_json("/auth/status", &[]).await
    }

    /// Invalidate the session on the backend
    pub async fn logout(&self) -> Result<(), ClientError> {
        let path = "/auth/logout";
        tracing::debug!(endpoint = path, "POST");

        let response = self.client.post(self.endpoint(path)).send().await?;
        let status = response.status();

        // The backend redirects back to the frontend once the cookie is cleared
        if status.is_success() || status.is_redirection() {
            tracing::info!("Logged out");
            Ok(())
        } else {
            Err(error_from_response(path, response).await)
        }
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json("/health", &[]).await
    }

    pub async fn kpis(&self) -> Result<KpiSummary, ClientError> {
        self.get_json("/api/dashboard/kpis", &[]).await
    }

    pub async fn stages(&self) -> Result<Vec<StageData>, ClientError> {
        let response: StagesResponse = self.get_json("/api/dashboard/stages", &[]).await?;
        Ok(response.stages)
    }

    pub async fn pipeline(&self, months: u32) -> Result<Vec<PipelineData>, ClientError> {
        let response: PipelineResponse = self
            .get_json("/api/dashboard/pipeline", &[("months", months.to_string())])
            .await?;
        Ok(response.pipeline)
    }

    pub async fn opportunities(
        &self,
        query: &OpportunityQuery,
    ) -> Result<OpportunityListResponse, ClientError> {
        self.get_json("/api/opportunities", &query.to_pairs()).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        tracing::debug!(endpoint = path, params = query.len(), "GET");

        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(endpoint = path, error = %e, "Undecodable response");
            ClientError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    fn login_url(&self) -> String {
        DashboardClient::login_url(self)
    }

    async fn auth_status(&self) -> Result<AuthStatus, ClientError> {
        DashboardClient::auth_status(self).await
    }

    async fn kpis(&self) -> Result<KpiSummary, ClientError> {
        DashboardClient::kpis(self).await
    }

    async fn stages(&self) -> Result<Vec<StageData>, ClientError> {
        DashboardClient::stages(self).await
    }

    async fn pipeline(&self, months: u32) -> Result<Vec<PipelineData>, ClientError> {
        DashboardClient::pipeline(self, months).await
    }

    async fn opportunities(
        &self,
        query: &OpportunityQuery,
    ) -> Result<OpportunityListResponse, ClientError> {
        DashboardClient::opportunities(self, query).await
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))
}

/// Map a non-2xx response, preferring the backend's `detail` message
async fn error_from_response(endpoint: &str, response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorDetail>(&text)
        .map(|body| body.detail)
        .ok()
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    tracing::warn!(endpoint, status = status.as_u16(), %message, "Request failed");

    if status == StatusCode::UNAUTHORIZED {
        ClientError::Unauthorized(message)
    } else {
        ClientError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{OpportunityFilters, SortField, StageFilter};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, session: Session) -> DashboardClient {
        let config = ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            session_cookie: None,
        };
        DashboardClient::new(&config, session).unwrap()
    }

    #[tokio::test]
    async fn test_kpis_decode_with_null_aggregates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/kpis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "open_pipeline": {"count": 4, "total": 120000.0, "average": 30000.0},
                "won_this_quarter": {"count": 0, "total": null},
                "lost_this_quarter": {"count": 1, "total": 5000.0}
            })))
            .mount(&server)
            .await;

        let kpis = client_for(&server, Session::new()).kpis().await.unwrap();
        assert_eq!(kpis.open.count, 4);
        assert_eq!(kpis.open.average, Some(30000.0));
        assert_eq!(kpis.won.total, 0.0);
        assert_eq!(kpis.lost.count, 1);
    }

    #[tokio::test]
    async fn test_stages_and_pipeline_unwrap_envelopes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stages": [{"StageName": "Prospecting", "cnt": 3, "total_amount": 75000.0}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/pipeline"))
            .and(query_param("months", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pipeline": [{"month": 3, "year": 2025, "total": 25000.0, "cnt": 2}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Session::new());
        let stages = client.stages().await.unwrap();
        assert_eq!(stages[0].stage_name, "Prospecting");
        assert_eq!(stages[0].count, 3);

        let pipeline = client.pipeline(6).await.unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline[0].month, 3);
    }

    #[tokio::test]
    async fn test_opportunities_send_filter_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/opportunities"))
            .and(query_param("stage", "Closed Won"))
            .and(query_param("sort_by", "Amount"))
            .and(query_param("limit", "25"))
            .and(query_param("offset", "0"))
            .and(query_param_is_missing("min_amount"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{
                    "Id": "006A", "Name": "Acme - Renewal", "StageName": "Closed Won",
                    "Amount": 52000.0, "CloseDate": "2025-03-05", "Probability": 100,
                    "Owner": {"Name": "Sarah Johnson"}, "Account": {"Name": "Acme Corp"},
                    "Type": "Renewal"
                }],
                "total": 1, "limit": 25, "offset": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut filters = OpportunityFilters::new();
        filters.set_stage(StageFilter::Stage("Closed Won".to_string()));
        filters.set_sort_by(SortField::Amount);

        let page = client_for(&server, Session::new())
            .opportunities(&filters.to_query())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].owner.as_deref(), Some("Sarah Johnson"));
    }

    #[tokio::test]
    async fn test_unauthorized_uses_detail_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/kpis"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, Session::new()).kpis().await.unwrap_err();
        match err {
            ClientError::Unauthorized(message) => assert_eq!(message, "Not authenticated"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stages"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server, Session::new()).stages().await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 502, .. }));
        assert_eq!(err.to_string(), "HTTP 502: upstream down");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, Session::new()).auth_status().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 5,
            session_cookie: None,
        };
        let client = DashboardClient::new(&config, Session::new()).unwrap();

        let err = client.auth_status().await.unwrap_err();
        assert!(matches!(err, ClientError::Unavailable));
    }

    #[tokio::test]
    async fn test_seeded_session_sends_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .and(header("cookie", "session_id=seeded"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authenticated": true})))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::with_cookie(&server.uri(), "seeded").unwrap();
        let status = client_for(&server, session).auth_status().await.unwrap();
        assert!(status.authenticated);
    }

    #[tokio::test]
    async fn test_begin_login_returns_redirect_and_keeps_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(307)
                    .insert_header("location", "https://login.salesforce.com/authorize?x=1")
                    .insert_header("set-cookie", "session_id=fresh; Path=/; HttpOnly"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Session::new());
        assert_eq!(client.login_url(), format!("{}/auth/login", server.uri()));

        let target = client.begin_login().await.unwrap();
        assert_eq!(target, "https://login.salesforce.com/authorize?x=1");
        assert_eq!(client.session_cookie().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_logout_accepts_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(307).insert_header("location", "http://localhost:3000"))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, Session::new()).logout().await.unwrap();
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        let result = DashboardClient::new(&config, Session::new());
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}
