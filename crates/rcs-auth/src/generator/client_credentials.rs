use async_trait::async_trait;
use reqwest::Client;

use super::{extra_fields, request_token, GeneratorConfig, GrantParams, TokenGenerator};
use crate::error::AuthResult;
use crate::token::Token;

/// Client credentials grant. Refreshing simply requests a new token.
pub struct ClientCredentialsGenerator {
    config: GeneratorConfig,
    client: Client,
}

impl ClientCredentialsGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: GeneratorConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl TokenGenerator for ClientCredentialsGenerator {
    async fn generate_token(&self, params: &GrantParams) -> AuthResult<Token> {
        let fields = extra_fields(params, &[]);
        request_token(&self.client, &self.config, "client_credentials", fields).await
    }

    async fn refresh_token(&self, _current: &Token, params: &GrantParams) -> AuthResult<Token> {
        self.generate_token(params).await
    }

    fn name(&self) -> &'static str {
        "client_credentials"
    }
}
