use chrono::Utc;
use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// An OAuth access token as returned by a token endpoint.
///
/// `expires_at` is not part of the token response: it is stamped as a unix
/// timestamp when the token is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Token {
    /// A bearer token without expiry or refresh token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            expires_in: None,
            refresh_token: None,
            scope: None,
            expires_at: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = Some(seconds);
        self
    }

    /// Stamp `expires_at` relative to `now` (unix seconds).
    pub fn stamped(mut self, now: i64) -> Self {
        self.expires_at = self.expires_in.map(|secs| now + secs);
        self
    }

    /// Seconds until expiry relative to `now`. Negative once expired.
    pub fn expires_in_at(&self, now: i64) -> Option<i64> {
        self.expires_at.map(|at| at - now)
    }

    /// Whether the token is past its expiry. Tokens without expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_in_at(Utc::now().timestamp())
            .is_some_and(|left| left <= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_token_response() {
        let token: Token = serde_json::from_value(json!({
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "def",
            "scope": "read",
        }))
        .unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, Some(3600));
        assert_eq!(token.refresh_token.as_deref(), Some("def"));
        assert_eq!(token.expires_at, None);
    }

    #[test]
    fn minimal_response_defaults() {
        let token: Token = serde_json::from_value(json!({"access_token": "abc"})).unwrap();
        assert_eq!(token, Token::new("abc"));
        assert!(!token.is_expired());
    }

    #[test]
    fn stamping_expiry() {
        let token = Token::new("abc").with_expires_in(60).stamped(1_000);
        assert_eq!(token.expires_at, Some(1_060));
        assert_eq!(token.expires_in_at(1_030), Some(30));
        assert_eq!(token.expires_in_at(1_090), Some(-30));
    }

    #[test]
    fn expired_token() {
        let token = Token::new("abc").with_expires_in(10).stamped(0);
        assert!(token.is_expired());
    }
}
