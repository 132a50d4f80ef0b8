//! OAuth authorization-code flow helpers.
//!
//! The user is sent to [`authorize_url`]; after consent Unsplash redirects
//! to `/oauth/authorize/native?code=...`, from which [`code_from_redirect`]
//! extracts the code to exchange via [`UnsplashApi::exchange_code`].
//!
//! [`UnsplashApi::exchange_code`]: crate::api::UnsplashApi::exchange_code

use url::Url;

use crate::config::UnsplashConfig;

/// Path Unsplash redirects to for out-of-band (native) clients.
pub const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";

/// Build the URL of the Unsplash consent page.
pub fn authorize_url(config: &UnsplashConfig) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/oauth/authorize", config.auth_url))?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.access_key)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &config.access_scope);
    Ok(url)
}

/// Extract the authorization code from a redirect URL.
///
/// Returns `None` unless the URL parses, its path is
/// [`NATIVE_REDIRECT_PATH`], and it carries a `code` query item.
pub fn code_from_redirect(redirect: &str) -> Option<String> {
    let url = Url::parse(redirect).ok()?;
    if url.path() != NATIVE_REDIRECT_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
}
