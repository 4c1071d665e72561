//! Token storage.
//!
//! [`TokenStorage`] keeps the current token in a [`TokenBackend`] under a
//! single key and drives the generator to obtain or refresh it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::{AuthError, AuthResult};
use crate::generator::{GrantParams, TokenGenerator};
use crate::token::Token;

/// Backend key the access token is stored under unless configured otherwise.
pub const DEFAULT_ACCESS_TOKEN_KEY: &str = "rest_client_sdk.api.access_token";

/// Async key/value store for serialized tokens.
#[async_trait]
pub trait TokenBackend: Send + Sync {
    async fn get_item(&self, key: &str) -> AuthResult<Option<String>>;

    async fn set_item(&self, key: &str, value: String) -> AuthResult<()>;

    async fn remove_item(&self, key: &str) -> AuthResult<()>;
}

/// In-memory token backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBackend for MemoryBackend {
    async fn get_item(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> AuthResult<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> AuthResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Current token of one client, and how to get a new one.
pub struct TokenStorage {
    generator: Arc<dyn TokenGenerator>,
    backend: Arc<dyn TokenBackend>,
    access_token_key: String,
    // Held for the whole read-refresh-store sequence.
    refresh_lock: Mutex<()>,
}

impl TokenStorage {
    pub fn new(generator: Arc<dyn TokenGenerator>, backend: Arc<dyn TokenBackend>) -> Self {
        Self::with_key(generator, backend, DEFAULT_ACCESS_TOKEN_KEY)
    }

    pub fn with_key(
        generator: Arc<dyn TokenGenerator>,
        backend: Arc<dyn TokenBackend>,
        access_token_key: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            backend,
            access_token_key: access_token_key.into(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn access_token_key(&self) -> &str {
        &self.access_token_key
    }

    pub fn can_refresh(&self) -> bool {
        self.generator.can_refresh()
    }

    pub async fn has_access_token(&self) -> AuthResult<bool> {
        Ok(self.backend.get_item(&self.access_token_key).await?.is_some())
    }

    /// The stored token, if any.
    pub async fn get_access_token_object(&self) -> AuthResult<Option<Token>> {
        match self.backend.get_item(&self.access_token_key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// The stored access token string, if any.
    pub async fn get_access_token(&self) -> AuthResult<Option<String>> {
        Ok(self
            .get_access_token_object()
            .await?
            .map(|token| token.access_token))
    }

    /// Seconds until the stored token expires. Negative once expired; `None`
    /// without a token or without an expiry.
    pub async fn get_current_token_expires_in(&self) -> AuthResult<Option<i64>> {
        Ok(self
            .get_access_token_object()
            .await?
            .and_then(|token| token.expires_in_at(Utc::now().timestamp())))
    }

    /// Obtain a token from the generator and store it.
    pub async fn generate_token(&self, params: &GrantParams) -> AuthResult<Token> {
        let token = self.generator.generate_token(params).await?;
        info!(generator = self.generator.name(), "generated access token");
        self.store(token).await
    }

    /// Refresh the stored token and store the result.
    ///
    /// A response without a refresh token keeps the previous one.
    pub async fn refresh_token(&self, params: &GrantParams) -> AuthResult<Token> {
        self.refresh_rejected_token(None, params).await
    }

    /// Refresh after the API rejected the access token `rejected`.
    ///
    /// When the stored token is no longer `rejected`, another caller has
    /// already refreshed it and the stored token is returned without a new
    /// exchange. Concurrent callers that saw the same rejected token thus
    /// share one refresh.
    pub async fn refresh_rejected_token(
        &self,
        rejected: Option<&str>,
        params: &GrantParams,
    ) -> AuthResult<Token> {
        let _guard = self.refresh_lock.lock().await;
        let current = self
            .get_access_token_object()
            .await?
            .ok_or(AuthError::NoToken)?;
        if rejected.is_some_and(|rejected| rejected != current.access_token) {
            debug!("access token already refreshed");
            return Ok(current);
        }

        let mut token = self.generator.refresh_token(&current, params).await?;
        if token.refresh_token.is_none() {
            token.refresh_token = current.refresh_token;
        }
        info!(generator = self.generator.name(), "refreshed access token");
        self.store(token).await
    }

    /// Drop the stored token.
    pub async fn logout(&self) -> AuthResult<()> {
        debug!(key = %self.access_token_key, "removing access token");
        self.backend.remove_item(&self.access_token_key).await
    }

    async fn store(&self, token: Token) -> AuthResult<Token> {
        let token = token.stamped(Utc::now().timestamp());
        let raw = serde_json::to_string(&token)?;
        self.backend.set_item(&self.access_token_key, raw).await?;
        Ok(token)
    }
}

impl std::fmt::Debug for TokenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStorage")
            .field("generator", &self.generator.name())
            .field("access_token_key", &self.access_token_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::config_for;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::generator::{PasswordGenerator, ProvidedTokenGenerator, RefreshFn, RefreshFuture};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provided(token: Token) -> TokenStorage {
        TokenStorage::new(
            Arc::new(ProvidedTokenGenerator::new(token)),
            Arc::new(MemoryBackend::new()),
        )
    }

    #[tokio::test]
    async fn memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_item("k").await.unwrap(), None);
        backend.set_item("k", "v".into()).await.unwrap();
        assert_eq!(backend.get_item("k").await.unwrap().as_deref(), Some("v"));
        backend.remove_item("k").await.unwrap();
        assert_eq!(backend.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_storage() {
        let storage = provided(Token::new("sso"));
        assert_eq!(storage.access_token_key(), DEFAULT_ACCESS_TOKEN_KEY);
        assert!(!storage.has_access_token().await.unwrap());
        assert_eq!(storage.get_access_token().await.unwrap(), None);
        assert_eq!(storage.get_current_token_expires_in().await.unwrap(), None);
    }

    #[tokio::test]
    async fn generate_stores_stamped_token() {
        let storage = provided(Token::new("sso").with_expires_in(3600));
        let token = storage.generate_token(&GrantParams::new()).await.unwrap();
        assert!(token.expires_at.is_some());

        assert!(storage.has_access_token().await.unwrap());
        assert_eq!(storage.get_access_token().await.unwrap().as_deref(), Some("sso"));
        let left = storage.get_current_token_expires_in().await.unwrap().unwrap();
        assert!((3590..=3600).contains(&left));
    }

    #[tokio::test]
    async fn token_without_expiry_has_no_expires_in() {
        let storage = provided(Token::new("sso"));
        storage.generate_token(&GrantParams::new()).await.unwrap();
        assert_eq!(storage.get_current_token_expires_in().await.unwrap(), None);
    }

    #[tokio::test]
    async fn logout_removes_token() {
        let storage = provided(Token::new("sso"));
        storage.generate_token(&GrantParams::new()).await.unwrap();
        storage.logout().await.unwrap();
        assert!(!storage.has_access_token().await.unwrap());
    }

    #[tokio::test]
    async fn refresh_without_stored_token_fails() {
        let storage = provided(Token::new("sso"));
        let err = storage.refresh_token(&GrantParams::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::NoToken));
    }

    #[tokio::test]
    async fn refresh_without_capability_fails() {
        let storage = provided(Token::new("sso"));
        storage.generate_token(&GrantParams::new()).await.unwrap();
        assert!(!storage.can_refresh());
        let err = storage.refresh_token(&GrantParams::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::RefreshUnsupported(_)));
    }

    #[tokio::test]
    async fn refresh_keeps_previous_refresh_token() {
        let refresh: RefreshFn = Arc::new(|_old: Token| -> RefreshFuture {
            Box::pin(async { Ok::<_, AuthError>(Token::new("renewed")) })
        });
        let generator =
            ProvidedTokenGenerator::new(Token::new("first").with_refresh_token("keep-me"))
                .with_refresh(refresh);
        let storage = TokenStorage::with_key(
            Arc::new(generator),
            Arc::new(MemoryBackend::new()),
            "custom.key",
        );
        storage.generate_token(&GrantParams::new()).await.unwrap();

        let token = storage.refresh_token(&GrantParams::new()).await.unwrap();
        assert_eq!(token.access_token, "renewed");
        assert_eq!(token.refresh_token.as_deref(), Some("keep-me"));

        let stored = storage.get_access_token_object().await.unwrap().unwrap();
        assert_eq!(stored, token);
    }

    #[tokio::test]
    async fn concurrent_rejections_share_one_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let refresh: RefreshFn = Arc::new(move |_old: Token| -> RefreshFuture {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move { Ok::<_, AuthError>(Token::new(format!("renewed-{n}"))) })
        });
        let generator = ProvidedTokenGenerator::new(Token::new("first")).with_refresh(refresh);
        let storage = Arc::new(TokenStorage::new(
            Arc::new(generator),
            Arc::new(MemoryBackend::new()),
        ));
        storage.generate_token(&GrantParams::new()).await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let storage = Arc::clone(&storage);
                tokio::spawn(async move {
                    storage
                        .refresh_rejected_token(Some("first"), &GrantParams::new())
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().access_token, "renewed-1");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Rejecting the current token refreshes again.
        let token = storage
            .refresh_rejected_token(Some("renewed-1"), &GrantParams::new())
            .await
            .unwrap();
        assert_eq!(token.access_token, "renewed-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn password_flow_against_token_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "first",
                "expires_in": 10,
                "refresh_token": "r1",
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "second",
                "expires_in": 10,
                "refresh_token": "r2",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let storage = TokenStorage::new(
            Arc::new(PasswordGenerator::new(config_for(&server))),
            Arc::new(MemoryBackend::new()),
        );
        let params = GrantParams::from([
            ("username".to_string(), "alice".to_string()),
            ("password".to_string(), "pw".to_string()),
        ]);
        storage.generate_token(&params).await.unwrap();
        assert_eq!(storage.get_access_token().await.unwrap().as_deref(), Some("first"));

        storage.refresh_token(&GrantParams::new()).await.unwrap();
        let stored = storage.get_access_token_object().await.unwrap().unwrap();
        assert_eq!(stored.access_token, "second");
        assert_eq!(stored.refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn corrupt_backend_value_is_a_serialization_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set_item(DEFAULT_ACCESS_TOKEN_KEY, "not json".into())
            .await
            .unwrap();
        let storage = TokenStorage::new(
            Arc::new(ProvidedTokenGenerator::new(Token::new("sso"))),
            backend,
        );
        let err = storage.get_access_token_object().await.unwrap_err();
        assert!(matches!(err, AuthError::Serialization(_)));
    }
}
