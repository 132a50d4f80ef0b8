//! REST API client for the Unsplash HTTP endpoints.
//!
//! [`UnsplashApi::fetch`] is the one fetch-and-decode path every endpoint
//! goes through: it builds the request, checks the status code, and
//! decodes the JSON body, classifying each failure as an
//! [`UnsplashApiError`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::UnsplashConfig;
use crate::messages::{OAuthTokenResponseBody, PhotoResult, ProfileResult, UserResult};

/// HTTP verbs used against Unsplash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Description of a single request relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the base URL, e.g. `/photos`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` body; empty means no body.
    pub form: Vec<(String, String)>,
    /// Sent as `Authorization: Bearer {token}` when present.
    pub bearer_token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
            bearer_token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add a form field. Used for values that must stay out of the URL.
    pub fn with_form(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.form.push((name.into(), value.to_string()));
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Errors from the Unsplash REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum UnsplashApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    ///
    /// The request URL is stripped from the inner error.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Unsplash returned a non-2xx status code.
    #[error("Unsplash API error ({status}): {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response arrived without a body.
    #[error("Unsplash returned an empty response body")]
    EmptyBody,

    /// The body was not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be built (bad base URL or path).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for UnsplashApiError {
    fn from(e: reqwest::Error) -> Self {
        UnsplashApiError::Transport(e.without_url())
    }
}

impl UnsplashApiError {
    /// HTTP status code, when the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            UnsplashApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client for one Unsplash host.
#[derive(Debug, Clone)]
pub struct UnsplashApi {
    client: reqwest::Client,
    api_url: String,
}

impl UnsplashApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://api.unsplash.com`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (shares the connection pool between the API and OAuth hosts).
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build an HTTP client honouring the configured request timeout.
    pub fn build_client(config: &UnsplashConfig) -> Result<reqwest::Client, UnsplashApiError> {
        Ok(reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?)
    }

    /// Base URL this client targets.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Resolve the absolute URL of `request`.
    pub fn request_url(&self, request: &ApiRequest) -> Result<Url, UnsplashApiError> {
        let raw = format!("{}{}", self.api_url, request.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| UnsplashApiError::InvalidRequest(format!("{raw}: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Send `request` and decode the JSON response into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, UnsplashApiError> {
        let url = self.request_url(&request)?;
        // Only the path is logged; queries and bodies may carry credentials.
        let path = url.path().to_string();
        tracing::debug!(method = request.method.as_str(), path = %path, "Unsplash request");

        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let result = match builder.send().await {
            Ok(response) => Self::parse_response(response).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = &result {
            tracing::warn!(method = request.method.as_str(), path = %path, error = %e, "Unsplash request failed");
        }
        result
    }

    /// List one page of the editorial photo feed.
    ///
    /// Sends `GET /photos?page={page}&per_page={per_page}`.
    pub async fn list_photos(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoResult>, UnsplashApiError> {
        let request = ApiRequest::get("/photos")
            .with_query("page", page)
            .with_query("per_page", per_page)
            .with_bearer(token);
        self.fetch(request).await
    }

    /// Fetch the authenticated user's profile (`GET /me`).
    pub async fn current_user(&self, token: &str) -> Result<ProfileResult, UnsplashApiError> {
        self.fetch(ApiRequest::get("/me").with_bearer(token)).await
    }

    /// Fetch a public user record (`GET /users/{username}`).
    pub async fn user(&self, token: &str, username: &str) -> Result<UserResult, UnsplashApiError> {
        self.fetch(ApiRequest::get(format!("/users/{username}")).with_bearer(token))
            .await
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Sends `POST /oauth/token` with the credentials as a form body, so
    /// the secret and the one-time code never appear in a URL. This client
    /// must target the OAuth host.
    pub async fn exchange_code(
        &self,
        config: &UnsplashConfig,
        code: &str,
    ) -> Result<OAuthTokenResponseBody, UnsplashApiError> {
        let request = ApiRequest::post("/oauth/token")
            .with_form("client_id", &config.access_key)
            .with_form("client_secret", &config.secret_key)
            .with_form("redirect_uri", &config.redirect_uri)
            .with_form("code", code)
            .with_form("grant_type", "authorization_code");
        self.fetch(request).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`UnsplashApiError::HttpStatus`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, UnsplashApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(UnsplashApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UnsplashApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(UnsplashApiError::EmptyBody);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
