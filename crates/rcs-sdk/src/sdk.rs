use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode, Url};
use tracing::{debug, info};

use rcs_auth::{GrantParams, TokenStorage};
use rcs_diff::UnitOfWork;
use rcs_mapping::Mapping;

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::repository::Repository;
use crate::serializer::Serializer;

/// Entry point of the SDK: one per API and authenticated user.
///
/// Owns the unit of work, so every repository obtained from the same client
/// shares one snapshot store.
pub struct RestClientSdk<S> {
    config: SdkConfig,
    mapping: Arc<Mapping>,
    unit_of_work: UnitOfWork,
    token_storage: Arc<TokenStorage>,
    serializer: S,
    client: Client,
}

impl<S: Serializer> RestClientSdk<S> {
    pub fn new(
        config: SdkConfig,
        mapping: Arc<Mapping>,
        token_storage: Arc<TokenStorage>,
        serializer: S,
    ) -> Self {
        let unit_of_work = UnitOfWork::with_enabled(Arc::clone(&mapping), config.unit_of_work_enabled);
        Self {
            config,
            mapping,
            unit_of_work,
            token_storage,
            serializer,
            client: Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS roots).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Repository for the class registered under `key`.
    pub fn get_repository(&self, key: &str) -> SdkResult<Repository<'_, S>> {
        let meta = self
            .mapping
            .class_metadata_by_key(key)
            .ok_or_else(|| SdkError::UnknownMetadata(key.to_string()))?;
        Ok(Repository::new(self, meta))
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn mapping(&self) -> &Arc<Mapping> {
        &self.mapping
    }

    pub fn unit_of_work(&self) -> &UnitOfWork {
        &self.unit_of_work
    }

    pub fn token_storage(&self) -> &Arc<TokenStorage> {
        &self.token_storage
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Send a request with the stored access token and return the response
    /// body.
    ///
    /// A `401` is answered by one token refresh and one retry when the token
    /// storage can refresh. Non-success statuses become [`SdkError`]s.
    pub async fn authorized_fetch(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> SdkResult<String> {
        let token = self.token_storage.get_access_token().await?;
        let mut response = self
            .send(method.clone(), url.clone(), token.as_deref(), body.as_deref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.token_storage.can_refresh() {
            info!(%url, "access token rejected, refreshing");
            let fresh = self
                .token_storage
                .refresh_rejected_token(token.as_deref(), &GrantParams::new())
                .await?;
            response = self
                .send(method, url, Some(&fresh.access_token), body.as_deref())
                .await?;
        }

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            debug!(status = status.as_u16(), "request failed");
            Err(SdkError::from_status(status.as_u16(), text))
        }
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<&str>,
    ) -> SdkResult<Response> {
        debug!(%method, %url, "sending request");
        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.header(
                AUTHORIZATION,
                format!("{} {}", self.config.authorization_type, token),
            );
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }
        Ok(request.send().await?)
    }
}

impl<S> std::fmt::Debug for RestClientSdk<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClientSdk")
            .field("base_url", &self.config.base_url())
            .field("unit_of_work", &self.unit_of_work)
            .finish()
    }
}
