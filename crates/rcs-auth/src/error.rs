//! OAuth error types.

use thiserror::Error;

/// Result type for token operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while obtaining, storing or refreshing tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authorization server rejected the grant (bad credentials, expired
    /// or revoked refresh token).
    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    /// The requested scope is invalid or exceeds what was granted.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Any other OAuth error response.
    #[error("oauth error {error}: {description}")]
    OAuth { error: String, description: String },

    /// The token endpoint answered with something that is not a token or an
    /// OAuth error.
    #[error("unexpected token endpoint response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// A grant was requested without one of its required parameters.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// No token is stored.
    #[error("no access token stored")]
    NoToken,

    /// The stored token has no refresh token.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The generator cannot refresh tokens.
    #[error("token refresh is not supported by {0}")]
    RefreshUnsupported(&'static str),

    /// The token backend failed.
    #[error("token storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Build the error matching an OAuth error code.
    pub fn from_oauth(error: &str, description: Option<String>) -> Self {
        let description = description.unwrap_or_default();
        match error {
            "invalid_grant" => Self::InvalidGrant(description),
            "invalid_scope" => Self::InvalidScope(description),
            _ => Self::OAuth {
                error: error.to_string(),
                description,
            },
        }
    }

    /// Returns `true` when re-authenticating is the only way forward.
    pub fn is_invalid_grant(&self) -> bool {
        matches!(self, Self::InvalidGrant(_) | Self::NoRefreshToken | Self::NoToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_codes_map_to_variants() {
        assert!(matches!(
            AuthError::from_oauth("invalid_grant", Some("expired".into())),
            AuthError::InvalidGrant(d) if d == "expired"
        ));
        assert!(matches!(
            AuthError::from_oauth("invalid_scope", None),
            AuthError::InvalidScope(_)
        ));
        let other = AuthError::from_oauth("unauthorized_client", Some("nope".into()));
        assert_eq!(other.to_string(), "oauth error unauthorized_client: nope");
    }

    #[test]
    fn invalid_grant_classification() {
        assert!(AuthError::InvalidGrant(String::new()).is_invalid_grant());
        assert!(AuthError::NoRefreshToken.is_invalid_grant());
        assert!(!AuthError::MissingParameter("code").is_invalid_grant());
    }
}
