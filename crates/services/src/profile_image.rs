//! Avatar URL of the current user.
//!
//! Same latest-call-wins shape as [`ProfileService`](crate::ProfileService);
//! each stored URL is announced with a
//! [`ServiceEventKind::ProfileImageChanged`](imagefeed_events::ServiceEventKind::ProfileImageChanged)
//! carrying the new URL.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use imagefeed_events::{EventBus, ServiceEvent};
use imagefeed_unsplash::UnsplashApi;

use crate::error::ServiceError;
use crate::token_store::TokenStore;

#[derive(Default)]
struct AvatarState {
    avatar_url: Option<String>,
    generation: u64,
}

pub struct ProfileImageService {
    api: Arc<UnsplashApi>,
    tokens: Arc<dyn TokenStore>,
    events: Arc<EventBus>,
    state: Mutex<AvatarState>,
}

impl ProfileImageService {
    pub fn new(api: Arc<UnsplashApi>, tokens: Arc<dyn TokenStore>, events: Arc<EventBus>) -> Self {
        Self {
            api,
            tokens,
            events,
            state: Mutex::new(AvatarState::default()),
        }
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.state().avatar_url.clone()
    }

    /// Fetch the large avatar URL of `username` (`GET /users/{username}`).
    pub async fn fetch_profile_image_url(&self, username: &str) -> Result<String, ServiceError> {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.generation
        };

        let token = self.tokens.token().ok_or_else(|| {
            tracing::error!(username, "No token available for avatar fetch");
            ServiceError::MissingToken
        })?;

        let user = match self.api.user(&token, username).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(username, error = %e, "Failed to fetch profile image");
                return Err(e.into());
            }
        };
        let avatar_url = user.profile_image.large;

        let stored = {
            let mut state = self.state();
            if state.generation == generation {
                state.avatar_url = Some(avatar_url.clone());
                true
            } else {
                false
            }
        };

        if stored {
            tracing::info!(username, avatar_url = %avatar_url, "Profile image loaded");
            self.events
                .publish(ServiceEvent::profile_image_changed(avatar_url.clone()));
        } else {
            tracing::debug!(username, "Superseded profile image response not stored");
        }
        Ok(avatar_url)
    }

    pub fn clear_avatar(&self) {
        let mut state = self.state();
        state.avatar_url = None;
        state.generation += 1;
    }

    fn state(&self) -> MutexGuard<'_, AvatarState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
