//! Current user's profile.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use imagefeed_core::profile::Profile;
use imagefeed_unsplash::{convert, UnsplashApi};

use crate::error::ServiceError;

#[derive(Default)]
struct ProfileState {
    profile: Option<Profile>,
    /// Bumped per request and per clear; only the latest request may store.
    generation: u64,
}

/// Loads and keeps the signed-in user's profile (`GET /me`).
pub struct ProfileService {
    api: Arc<UnsplashApi>,
    state: Mutex<ProfileState>,
}

impl ProfileService {
    pub fn new(api: Arc<UnsplashApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ProfileState::default()),
        }
    }

    /// Last profile loaded, if any.
    pub fn profile(&self) -> Option<Profile> {
        self.state().profile.clone()
    }

    /// Fetch the profile for `token`.
    ///
    /// The latest call wins: a response that arrives after a newer call
    /// (or a clear) is returned to its caller but not kept.
    pub async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError> {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.generation
        };

        let result = self.api.current_user(token).await;

        let profile = match result {
            Ok(raw) => convert::to_profile(raw),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch profile");
                return Err(e.into());
            }
        };

        let mut state = self.state();
        if state.generation == generation {
            state.profile = Some(profile.clone());
            tracing::info!(username = %profile.username, "Profile loaded");
        } else {
            tracing::debug!(username = %profile.username, "Superseded profile response not stored");
        }
        Ok(profile)
    }

    pub fn clear_profile(&self) {
        let mut state = self.state();
        state.profile = None;
        state.generation += 1;
    }

    fn state(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
