use imagefeed_core::types::PhotoId;
use imagefeed_unsplash::UnsplashApiError;

use crate::token_store::TokenStoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No OAuth token in storage")]
    MissingToken,

    #[error(transparent)]
    Api(#[from] UnsplashApiError),

    #[error("Photo {0} not found")]
    PhotoNotFound(PhotoId),

    #[error("Token storage error: {0}")]
    TokenStore(#[from] TokenStoreError),
}
