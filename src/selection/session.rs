//! Admin API credentials.

use std::fmt;

/// Bearer credentials for the admin API.
///
/// Constructed once at sign-in and passed explicitly to every client call,
/// then dropped at logout. Replaces the ambient browser-storage token the
/// dashboard read on every request. There is no refresh or rotation; an
/// expired token surfaces as a 401/403 from upstream.
#[derive(Clone)]
pub struct Session {
    user_id: String,
    token: String,
}

impl Session {
    pub fn sign_in(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Invalidate the session by consuming it.
    pub fn sign_out(self) {}
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let session = Session::sign_in("u-42", "tok123");
        assert_eq!(session.bearer(), "Bearer tok123");
        assert_eq!(session.user_id(), "u-42");
    }

    #[test]
    fn test_sign_out_consumes_session() {
        let session = Session::sign_in("u-42", "tok123");
        session.sign_out();
        // `session` is moved; later calls would not compile.
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::sign_in("u-42", "tok123");
        let debug = format!("{session:?}");
        assert!(!debug.contains("tok123"));
    }
}
