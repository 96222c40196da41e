//! Auth Gate
//!
//! Session state as seen by the root controller. The status is checked once
//! at startup; anything other than a positive answer is treated as signed out.

use crate::models::AuthStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Status check still in flight
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl AuthState {
    /// Resolve the startup status check. Fails closed.
    pub fn resolve<E>(result: Result<AuthStatus, E>) -> Self {
        match result {
            Ok(AuthStatus { authenticated: true }) => AuthState::Authenticated,
            Ok(_) | Err(_) => AuthState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }
}

pub const LOGIN_TITLE: &str = "Sales Pipeline Dashboard";
pub const LOGIN_MESSAGE: &str = "Sign in with Salesforce to view your pipeline.";
pub const LOGIN_BUTTON: &str = "Login with Salesforce";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fails_closed() {
        let ok = AuthState::resolve::<String>(Ok(AuthStatus { authenticated: true }));
        assert_eq!(ok, AuthState::Authenticated);

        let denied = AuthState::resolve::<String>(Ok(AuthStatus { authenticated: false }));
        assert_eq!(denied, AuthState::Unauthenticated);

        let failed = AuthState::resolve::<String>(Err("connection refused".into()));
        assert_eq!(failed, AuthState::Unauthenticated);
    }

    #[test]
    fn test_default_is_unknown() {
        let state = AuthState::default();
        assert!(!state.is_known());
        assert!(!state.is_authenticated());
    }
}
