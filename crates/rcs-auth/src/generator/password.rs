use async_trait::async_trait;
use reqwest::Client;

use super::{
    extra_fields, refresh_with_refresh_token, request_token, required, GeneratorConfig,
    GrantParams, TokenGenerator,
};
use crate::error::AuthResult;
use crate::token::Token;

/// Resource owner password grant.
///
/// `generate_token` requires `username` and `password` parameters.
pub struct PasswordGenerator {
    config: GeneratorConfig,
    client: Client,
}

impl PasswordGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: GeneratorConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl TokenGenerator for PasswordGenerator {
    async fn generate_token(&self, params: &GrantParams) -> AuthResult<Token> {
        let username = required(params, "username")?;
        let password = required(params, "password")?;
        let mut fields = vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        fields.extend(extra_fields(params, &["username", "password"]));
        request_token(&self.client, &self.config, "password", fields).await
    }

    async fn refresh_token(&self, current: &Token, params: &GrantParams) -> AuthResult<Token> {
        refresh_with_refresh_token(&self.client, &self.config, current, params).await
    }

    fn name(&self) -> &'static str {
        "password"
    }
}
