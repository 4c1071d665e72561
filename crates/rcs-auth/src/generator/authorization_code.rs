use async_trait::async_trait;
use reqwest::Client;

use super::{
    extra_fields, refresh_with_refresh_token, request_token, required, GeneratorConfig,
    GrantParams, TokenGenerator,
};
use crate::error::AuthResult;
use crate::token::Token;

/// Authorization code grant.
///
/// `generate_token` requires `code` and `redirect_uri` parameters. Refresh
/// goes through the `refresh_token` grant.
pub struct AuthorizationCodeGenerator {
    config: GeneratorConfig,
    client: Client,
}

impl AuthorizationCodeGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: GeneratorConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl TokenGenerator for AuthorizationCodeGenerator {
    async fn generate_token(&self, params: &GrantParams) -> AuthResult<Token> {
        let code = required(params, "code")?;
        let redirect_uri = required(params, "redirect_uri")?;
        let mut fields = vec![
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
        ];
        fields.extend(extra_fields(params, &["code", "redirect_uri"]));
        request_token(&self.client, &self.config, "authorization_code", fields).await
    }

    async fn refresh_token(&self, current: &Token, params: &GrantParams) -> AuthResult<Token> {
        refresh_with_refresh_token(&self.client, &self.config, current, params).await
    }

    fn name(&self) -> &'static str {
        "authorization_code"
    }
}
