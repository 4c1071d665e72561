//! Token generators: how a client obtains and refreshes tokens.

mod authorization_code;
mod client_credentials;
mod password;
mod provided;

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::token::Token;

pub use authorization_code::AuthorizationCodeGenerator;
pub use client_credentials::ClientCredentialsGenerator;
pub use password::PasswordGenerator;
pub use provided::{ProvidedTokenGenerator, RefreshFn, RefreshFuture};

/// Grant parameters (`username`, `code`, `scope`, ...). Extra entries are
/// forwarded to the token endpoint as form fields.
pub type GrantParams = BTreeMap<String, String>;

/// A strategy for obtaining tokens.
#[async_trait]
pub trait TokenGenerator: Send + Sync {
    /// Obtain a fresh token.
    async fn generate_token(&self, params: &GrantParams) -> AuthResult<Token>;

    /// Exchange `current` for a new token.
    async fn refresh_token(&self, current: &Token, params: &GrantParams) -> AuthResult<Token>;

    /// Whether [`refresh_token`](Self::refresh_token) can succeed at all.
    fn can_refresh(&self) -> bool {
        true
    }

    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_token_path() -> String {
    "/oauth/v2/token".to_string()
}

/// Location of the token endpoint and the client credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Host name of the authorization server.
    pub path: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            path: String::new(),
            port: None,
            token_path: default_token_path(),
            client_id: String::new(),
            client_secret: None,
        }
    }
}

impl GeneratorConfig {
    /// Full URL of the token endpoint.
    pub fn token_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}{}", self.scheme, self.path, port, self.token_path),
            None => format!("{}://{}{}", self.scheme, self.path, self.token_path),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    error_description: Option<String>,
}

/// POST a grant to the token endpoint and decode the answer.
pub(crate) async fn request_token(
    client: &Client,
    config: &GeneratorConfig,
    grant_type: &str,
    fields: Vec<(String, String)>,
) -> AuthResult<Token> {
    let mut form = vec![
        ("grant_type".to_string(), grant_type.to_string()),
        ("client_id".to_string(), config.client_id.clone()),
    ];
    if let Some(secret) = &config.client_secret {
        form.push(("client_secret".to_string(), secret.clone()));
    }
    form.extend(fields);

    debug!(grant_type, url = %config.token_url(), "requesting token");
    let response = client.post(config.token_url()).form(&form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }
    match serde_json::from_str::<OAuthErrorBody>(&body) {
        Ok(err) => Err(AuthError::from_oauth(&err.error, err.error_description)),
        Err(_) => Err(AuthError::UnexpectedResponse {
            status: status.as_u16(),
            body,
        }),
    }
}

/// Look up a required grant parameter.
pub(crate) fn required<'p>(params: &'p GrantParams, name: &'static str) -> AuthResult<&'p str> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or(AuthError::MissingParameter(name))
}

/// Every parameter not in `consumed`, as form fields.
pub(crate) fn extra_fields(params: &GrantParams, consumed: &[&str]) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(k, _)| !consumed.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Shared `refresh_token` grant.
pub(crate) async fn refresh_with_refresh_token(
    client: &Client,
    config: &GeneratorConfig,
    current: &Token,
    params: &GrantParams,
) -> AuthResult<Token> {
    let refresh_token = current
        .refresh_token
        .as_ref()
        .ok_or(AuthError::NoRefreshToken)?;
    let mut fields = vec![("refresh_token".to_string(), refresh_token.clone())];
    fields.extend(extra_fields(params, &["refresh_token"]));
    request_token(client, config, "refresh_token", fields).await
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_url_with_and_without_port() {
        let mut config = GeneratorConfig {
            path: "auth.example.com".into(),
            client_id: "app".into(),
            ..Default::default()
        };
        assert_eq!(config.token_url(), "https://auth.example.com/oauth/v2/token");
        config.port = Some(8443);
        assert_eq!(config.token_url(), "https://auth.example.com:8443/oauth/v2/token");
    }

    #[test]
    fn required_and_extra_params() {
        let mut params = GrantParams::new();
        params.insert("username".into(), "alice".into());
        params.insert("scope".into(), "read".into());
        assert_eq!(required(&params, "username").unwrap(), "alice");
        assert!(matches!(
            required(&params, "password"),
            Err(AuthError::MissingParameter("password"))
        ));
        assert_eq!(
            extra_fields(&params, &["username"]),
            vec![("scope".to_string(), "read".to_string())]
        );
    }
}
