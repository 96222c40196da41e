//! Auth Routes
//!
//! - GET /auth/login - issue a session and redirect to the frontend
//! - GET /auth/status - `{authenticated}`
//! - POST /auth/logout - forget the session and clear the cookie
//!
//! There is no identity provider here: logging in always succeeds.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use crate::demo::state::{expired_session_cookie, session_cookie, session_id, DemoState};
use crate::models::AuthStatus;

/// GET /auth/login
pub async fn login(State(state): State<Arc<DemoState>>) -> Response {
    let redirect = Redirect::temporary(&state.config.frontend_url);

    if !state.config.require_session {
        return redirect.into_response();
    }

    let id = state.create_session().await;
    tracing::info!("Demo session created");
    (
        AppendHeaders([(header::SET_COOKIE, session_cookie(&id))]),
        redirect,
    )
        .into_response()
}

/// GET /auth/status
pub async fn status(State(state): State<Arc<DemoState>>, headers: HeaderMap) -> Json<AuthStatus> {
    Json(AuthStatus {
        authenticated: state.is_authenticated(&headers).await,
    })
}

/// POST /auth/logout
pub async fn logout(State(state): State<Arc<DemoState>>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers) {
        if state.end_session(&id).await {
            tracing::info!("Demo session ended");
        }
    }

    (
        AppendHeaders([(header::SET_COOKIE, expired_session_cookie())]),
        Redirect::temporary(&state.config.frontend_url),
    )
        .into_response()
}
