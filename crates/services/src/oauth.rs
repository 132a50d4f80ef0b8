//! Authorization-code exchange.

use std::sync::Arc;

use imagefeed_unsplash::{UnsplashApi, UnsplashConfig};

use crate::error::ServiceError;
use crate::token_store::TokenStore;

/// Exchanges OAuth codes for bearer tokens and stores them.
pub struct OAuth2Service {
    /// Client pointed at the OAuth host, not the REST API host.
    auth_api: UnsplashApi,
    config: Arc<UnsplashConfig>,
    tokens: Arc<dyn TokenStore>,
}

impl OAuth2Service {
    pub fn new(auth_api: UnsplashApi, config: Arc<UnsplashConfig>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            auth_api,
            config,
            tokens,
        }
    }

    /// Exchange `code` for an access token, persist it, and return it.
    pub async fn fetch_oauth_token(&self, code: &str) -> Result<String, ServiceError> {
        let body = self
            .auth_api
            .exchange_code(&self.config, code)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "OAuth code exchange failed"))?;

        self.tokens.set_token(&body.access_token)?;
        tracing::info!(token_type = %body.token_type, scope = %body.scope, "OAuth token obtained");
        Ok(body.access_token)
    }
}
