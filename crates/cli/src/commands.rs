//! Subcommand handlers. Each prints its result to stdout.

use anyhow::Context;
use imagefeed_unsplash::oauth;
use serde::Serialize;

use crate::session::Session;

/// Print the URL the user opens to grant access.
pub fn authorize_url(session: &Session) -> anyhow::Result<()> {
    let url = oauth::authorize_url(&session.config).context("Failed to build authorize URL")?;
    println!("{url}");
    Ok(())
}

/// Exchange an authorization code and store the resulting token.
pub async fn login(session: &Session, code: &str) -> anyhow::Result<()> {
    session
        .oauth
        .fetch_oauth_token(code)
        .await
        .context("Failed to exchange authorization code")?;
    println!("Logged in; token stored at {}", session.tokens.path().display());
    Ok(())
}

/// Like [`login`], taking the full redirect URL instead of the bare code.
pub async fn login_redirect(session: &Session, redirect: &str) -> anyhow::Result<()> {
    let code = oauth::code_from_redirect(redirect).with_context(|| {
        format!("{redirect} is not an authorization redirect carrying a code")
    })?;
    login(session, &code).await
}

/// Load `pages` pages and print the feed as JSON.
pub async fn feed(session: &Session, pages: u32) -> anyhow::Result<()> {
    session.load_pages(pages).await?;
    print_json(&session.images_list.photos())
}

/// Load `pages` pages, toggle the like flag of `photo_id`, print the photo.
pub async fn like(session: &Session, photo_id: &str, pages: u32) -> anyhow::Result<()> {
    session.load_pages(pages).await?;

    let current = session
        .images_list
        .photos()
        .into_iter()
        .find(|photo| photo.id == photo_id)
        .map(|photo| photo.is_liked)
        .unwrap_or_default();

    session
        .images_list
        .change_like(photo_id, current)
        .with_context(|| format!("Photo {photo_id} is not in the first {pages} page(s)"))?;

    let updated = session
        .images_list
        .photos()
        .into_iter()
        .find(|photo| photo.id == photo_id);
    print_json(&updated)
}

#[derive(Serialize)]
struct ProfileOutput {
    #[serde(flatten)]
    profile: imagefeed_core::profile::Profile,
    avatar_url: Option<String>,
}

/// Fetch and print the current profile with its avatar URL.
pub async fn profile(session: &Session) -> anyhow::Result<()> {
    let token = session.require_token()?;
    let profile = session
        .profile
        .fetch_profile(&token)
        .await
        .context("Failed to fetch profile")?;

    // The avatar is optional decoration; a failure is logged by the service.
    let avatar_url = session
        .profile_image
        .fetch_profile_image_url(&profile.username)
        .await
        .ok();

    print_json(&ProfileOutput {
        profile,
        avatar_url,
    })
}

/// Clear every service and the stored token.
pub fn logout(session: &Session) -> anyhow::Result<()> {
    session.logout.logout().context("Failed to remove stored token")?;
    println!("Logged out");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
