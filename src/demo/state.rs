//! Demo Backend State
//!
//! Shared by all handlers behind an `Arc`: the dataset, the config and the
//! in-memory session set.

use axum::http::{header, HeaderMap};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::data::DemoDataset;
use super::error::DemoError;
use crate::client::SESSION_COOKIE;
use crate::config::DemoConfig;

/// Session cookie lifetime, seconds
pub const SESSION_MAX_AGE: u64 = 60 * 60 * 8;

#[derive(Clone)]
pub struct DemoState {
    pub dataset: Arc<DemoDataset>,
    pub config: Arc<DemoConfig>,
    sessions: Arc<RwLock<HashSet<String>>>,
}

impl DemoState {
    pub fn new(dataset: DemoDataset, config: DemoConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Generate the dataset described by `config` around today's date
    pub fn from_config(config: DemoConfig) -> Self {
        let today = chrono::Local::now().date_naive();
        let dataset = DemoDataset::generate(config.seed, config.records, today);
        tracing::info!(
            records = dataset.len(),
            seed = config.seed,
            %today,
            "Generated demo dataset"
        );
        Self::new(dataset, config)
    }

    pub async fn create_session(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone());
        id
    }

    pub async fn end_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id)
    }

    /// Whether the request carries a live session (always true when sessions
    /// are not required)
    pub async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        if !self.config.require_session {
            return true;
        }
        match session_id(headers) {
            Some(id) => self.sessions.read().await.contains(&id),
            None => false,
        }
    }

    pub async fn require_session(&self, headers: &HeaderMap) -> Result<(), DemoError> {
        if self.is_authenticated(headers).await {
            Ok(())
        } else {
            Err(DemoError::Unauthorized("Not authenticated".to_string()))
        }
    }
}

/// `session_id` value from the request's cookie headers
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

pub fn session_cookie(id: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, id, SESSION_MAX_AGE
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}
