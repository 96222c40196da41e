//! Demo Routes
//!
//! Handlers grouped the way the backend proxy groups them.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod opportunities;
