//! Paging seam between the feed service and the transport.

use async_trait::async_trait;

use crate::api::{UnsplashApi, UnsplashApiError};
use crate::messages::PhotoResult;

/// Something that can return one page of photo records.
///
/// [`UnsplashApi`] is the production implementation; tests substitute
/// in-memory sources.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn list_photos(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoResult>, UnsplashApiError>;
}

#[async_trait]
impl PhotoSource for UnsplashApi {
    async fn list_photos(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoResult>, UnsplashApiError> {
        UnsplashApi::list_photos(self, token, page, per_page).await
    }
}
