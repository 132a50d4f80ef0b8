//! Unsplash credentials and endpoints loaded from the environment.

/// Unsplash application credentials and endpoints.
///
/// Loaded from environment variables; everything except the access key
/// has a default suitable for the public Unsplash API.
#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    /// Application access key, sent as `client_id`.
    pub access_key: String,
    /// Application secret, sent as `client_secret` during code exchange.
    pub secret_key: String,
    /// OAuth redirect URI registered for the application.
    pub redirect_uri: String,
    /// Space-separated OAuth scopes.
    pub access_scope: String,
    /// REST API base URL (default: `https://api.unsplash.com`).
    pub api_url: String,
    /// OAuth host base URL (default: `https://unsplash.com`).
    pub auth_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

pub const DEFAULT_API_URL: &str = "https://api.unsplash.com";
pub const DEFAULT_AUTH_URL: &str = "https://unsplash.com";
pub const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
pub const DEFAULT_ACCESS_SCOPE: &str = "public read_user write_likes";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading [`UnsplashConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl UnsplashConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `UNSPLASH_ACCESS_KEY`   | required                         |
    /// | `UNSPLASH_SECRET_KEY`   | empty                            |
    /// | `UNSPLASH_REDIRECT_URI` | `urn:ietf:wg:oauth:2.0:oob`      |
    /// | `UNSPLASH_ACCESS_SCOPE` | `public read_user write_likes`   |
    /// | `UNSPLASH_API_URL`      | `https://api.unsplash.com`       |
    /// | `UNSPLASH_AUTH_URL`     | `https://unsplash.com`           |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = lookup("UNSPLASH_ACCESS_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("UNSPLASH_ACCESS_KEY"))?;

        let secret_key = lookup("UNSPLASH_SECRET_KEY").unwrap_or_default();
        let redirect_uri =
            lookup("UNSPLASH_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.into());
        let access_scope =
            lookup("UNSPLASH_ACCESS_SCOPE").unwrap_or_else(|| DEFAULT_ACCESS_SCOPE.into());

        let api_url = validate_base_url(
            "UNSPLASH_API_URL",
            lookup("UNSPLASH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
        )?;
        let auth_url = validate_base_url(
            "UNSPLASH_AUTH_URL",
            lookup("UNSPLASH_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into()),
        )?;

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            access_key,
            secret_key,
            redirect_uri,
            access_scope,
            api_url,
            auth_url,
            request_timeout_secs,
        })
    }
}

/// Check that `value` is an absolute URL and strip any trailing slash.
fn validate_base_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    url::Url::parse(&value).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    Ok(value.trim_end_matches('/').to_string())
}
