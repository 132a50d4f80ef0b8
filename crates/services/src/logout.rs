//! Session reset on logout.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::images_list::ImagesListService;
use crate::profile::ProfileService;
use crate::profile_image::ProfileImageService;
use crate::token_store::TokenStore;

/// Resets every session service so the same instances can serve the next
/// login.
pub struct LogoutService {
    profile: Arc<ProfileService>,
    profile_image: Arc<ProfileImageService>,
    images_list: Arc<ImagesListService>,
    tokens: Arc<dyn TokenStore>,
}

impl LogoutService {
    pub fn new(
        profile: Arc<ProfileService>,
        profile_image: Arc<ProfileImageService>,
        images_list: Arc<ImagesListService>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            profile,
            profile_image,
            images_list,
            tokens,
        }
    }

    /// Clear profile, avatar, photos, then the stored token.
    ///
    /// In-memory state is always reset; the error only reports a failed
    /// token-store write.
    pub fn logout(&self) -> Result<(), ServiceError> {
        self.profile.clear_profile();
        self.profile_image.clear_avatar();
        self.images_list.clear_photos();
        self.tokens.clear_token()?;
        tracing::info!("Logged out");
        Ok(())
    }
}
