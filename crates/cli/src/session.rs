//! Composition root: one shared instance of every service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use imagefeed_events::{EventBus, ServiceEvent, ServiceEventKind};
use imagefeed_services::{
    FileTokenStore, ImagesListService, LogoutService, OAuth2Service, ProfileImageService,
    ProfileService, TokenStore,
};
use imagefeed_unsplash::{UnsplashApi, UnsplashConfig};
use tokio::sync::broadcast;

/// Upper bound for one page fetch to complete.
const PAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// How often to re-check the feed while waiting for a page event.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Every service of a signed-in (or signing-in) user.
pub struct Session {
    pub config: Arc<UnsplashConfig>,
    pub events: Arc<EventBus>,
    pub tokens: Arc<FileTokenStore>,
    pub oauth: OAuth2Service,
    pub profile: Arc<ProfileService>,
    pub profile_image: Arc<ProfileImageService>,
    pub images_list: Arc<ImagesListService>,
    pub logout: LogoutService,
}

impl Session {
    /// Wire all services against `config`, persisting the token at
    /// `token_path`.
    pub fn build(config: UnsplashConfig, token_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let client = UnsplashApi::build_client(&config).context("Failed to build HTTP client")?;

        let api = Arc::new(UnsplashApi::with_client(client.clone(), config.api_url.clone()));
        let auth_api = UnsplashApi::with_client(client, config.auth_url.clone());

        let events = Arc::new(EventBus::default());
        let tokens = Arc::new(FileTokenStore::new(token_path));

        let oauth = OAuth2Service::new(auth_api, Arc::clone(&config), tokens.clone());
        let profile = Arc::new(ProfileService::new(Arc::clone(&api)));
        let profile_image = Arc::new(ProfileImageService::new(
            Arc::clone(&api),
            tokens.clone(),
            Arc::clone(&events),
        ));
        let images_list = ImagesListService::new(api, tokens.clone(), Arc::clone(&events));
        let logout = LogoutService::new(
            Arc::clone(&profile),
            Arc::clone(&profile_image),
            Arc::clone(&images_list),
            tokens.clone(),
        );

        tracing::debug!(
            api_url = %config.api_url,
            token_path = %tokens.path().display(),
            "Session assembled"
        );

        Ok(Self {
            config,
            events,
            tokens,
            oauth,
            profile,
            profile_image,
            images_list,
            logout,
        })
    }

    /// Stored bearer token, or an error telling the user to log in.
    pub fn require_token(&self) -> anyhow::Result<String> {
        self.tokens
            .token()
            .context("Not logged in; run `imagefeed login <code>` first")
    }

    /// Load `pages` further pages into the feed, one at a time.
    ///
    /// Each fetch is awaited through the event bus. A fetch that finishes
    /// without advancing the cursor is reported as an error.
    pub async fn load_pages(&self, pages: u32) -> anyhow::Result<()> {
        self.require_token()?;
        let mut rx = self.events.subscribe();

        for _ in 0..pages {
            let before = self.images_list.last_loaded_page();
            self.images_list.fetch_photos_next_page();

            tokio::time::timeout(PAGE_TIMEOUT, self.wait_for_feed(&mut rx))
                .await
                .context("Timed out waiting for photos page")?;

            let after = self.images_list.last_loaded_page();
            if after == before {
                anyhow::bail!(
                    "Failed to load photos page {}; see log for details",
                    before.map_or(1, |page| page + 1)
                );
            }
            tracing::info!(
                page = after.unwrap_or_default(),
                total = self.images_list.photos().len(),
                "Photos page loaded"
            );
        }
        Ok(())
    }

    /// Resolve once the feed has published a change or gone idle.
    async fn wait_for_feed(&self, rx: &mut broadcast::Receiver<ServiceEvent>) {
        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(event) if event.kind == ServiceEventKind::ImagesListChanged => return,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                },
                _ = tokio::time::sleep(IDLE_POLL) => {
                    if !self.images_list.is_fetching() {
                        return;
                    }
                }
            }
        }
    }
}
