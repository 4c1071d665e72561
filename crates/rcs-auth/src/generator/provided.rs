use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::{GrantParams, TokenGenerator};
use crate::error::{AuthError, AuthResult};
use crate::token::Token;

/// Future returned by a [`RefreshFn`].
pub type RefreshFuture = Pin<Box<dyn Future<Output = AuthResult<Token>> + Send>>;

/// Callback that exchanges an expired token for a new one.
pub type RefreshFn = Arc<dyn Fn(Token) -> RefreshFuture + Send + Sync>;

/// Hands out a token obtained outside the SDK, e.g. from a single sign-on
/// flow in the host application.
///
/// Without a refresh callback the token cannot be refreshed and a `401`
/// from the API surfaces as an error.
pub struct ProvidedTokenGenerator {
    token: Token,
    refresh: Option<RefreshFn>,
}

impl ProvidedTokenGenerator {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            refresh: None,
        }
    }

    pub fn with_refresh(mut self, refresh: RefreshFn) -> Self {
        self.refresh = Some(refresh);
        self
    }
}

#[async_trait]
impl TokenGenerator for ProvidedTokenGenerator {
    async fn generate_token(&self, _params: &GrantParams) -> AuthResult<Token> {
        Ok(self.token.clone())
    }

    async fn refresh_token(&self, current: &Token, _params: &GrantParams) -> AuthResult<Token> {
        match &self.refresh {
            Some(refresh) => refresh(current.clone()).await,
            None => Err(AuthError::RefreshUnsupported(self.name())),
        }
    }

    fn can_refresh(&self) -> bool {
        self.refresh.is_some()
    }

    fn name(&self) -> &'static str {
        "provided"
    }
}

impl std::fmt::Debug for ProvidedTokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidedTokenGenerator")
            .field("can_refresh", &self.refresh.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hands_out_the_provided_token() {
        let generator = ProvidedTokenGenerator::new(Token::new("sso"));
        let token = generator.generate_token(&GrantParams::new()).await.unwrap();
        assert_eq!(token.access_token, "sso");
        assert!(!generator.can_refresh());
    }

    #[tokio::test]
    async fn refresh_without_callback_is_unsupported() {
        let generator = ProvidedTokenGenerator::new(Token::new("sso"));
        let err = generator
            .refresh_token(&Token::new("sso"), &GrantParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RefreshUnsupported("provided")));
    }

    #[tokio::test]
    async fn refresh_invokes_callback() {
        let refresh: RefreshFn = Arc::new(|old: Token| -> RefreshFuture {
            Box::pin(async move {
                Ok::<_, AuthError>(Token::new(format!("{}-renewed", old.access_token)))
            })
        });
        let generator = ProvidedTokenGenerator::new(Token::new("sso")).with_refresh(refresh);
        assert!(generator.can_refresh());

        let token = generator
            .refresh_token(&Token::new("sso"), &GrantParams::new())
            .await
            .unwrap();
        assert_eq!(token.access_token, "sso-renewed");
    }
}
