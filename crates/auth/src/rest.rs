//! REST identity resolver
//!
//! Looks users up in the identity service's internal API:
//! `GET {base}/int/user/findByToken/{token}` and `GET {base}/int/user/{id}`.
//! Tokens end up in the request path, so request errors are reported
//! without their URL.

use reqwest::{StatusCode, Url};

use crate::config::IdentityConfig;
use crate::error::IdentityError;
use crate::types::Identity;
use crate::IdentityResolver;

/// Identity resolver backed by the identity service's HTTP API
pub struct RestIdentityResolver {
    http: reqwest::Client,
    base_url: Url,
}

impl RestIdentityResolver {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            IdentityError::Configuration(format!(
                "invalid identity service URL {}: {}",
                config.base_url, e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(IdentityError::Configuration(format!(
                "identity service URL {} cannot be a base",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IdentityError::Configuration(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch(&self, url: Url) -> Result<Identity, IdentityError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.without_url().to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Identity>()
                .await
                .map_err(|e| IdentityError::Decode(e.without_url().to_string())),
            StatusCode::NOT_FOUND => Err(IdentityError::NotFound),
            status => Err(IdentityError::UnexpectedStatus(status.as_u16())),
        }
    }
}

#[async_trait::async_trait]
impl IdentityResolver for RestIdentityResolver {
    async fn resolve_by_token(&self, token: &str) -> Result<Identity, IdentityError> {
        let url = self.endpoint(&["int", "user", "findByToken", token]);
        let result = self.fetch(url).await;
        if let Err(err) = &result {
            tracing::debug!(error = %err, "Identity lookup by token failed");
        }
        result
    }

    async fn resolve_by_id(&self, id: &str) -> Result<Identity, IdentityError> {
        let url = self.endpoint(&["int", "user", id]);
        let result = self.fetch(url).await;
        if let Err(err) = &result {
            tracing::debug!(error = %err, user_id = %id, "Identity lookup by id failed");
        }
        result
    }
}
