//! Session services of the ImageFeed client.
//!
//! - [`ImagesListService`] -- the paged photo feed with like toggling.
//! - [`ProfileService`] / [`ProfileImageService`] -- current user data.
//! - [`OAuth2Service`] -- authorization-code exchange.
//! - [`LogoutService`] -- resets every service and the stored token.
//! - [`token_store`] -- bearer token persistence.

pub mod error;
pub mod images_list;
pub mod logout;
pub mod oauth;
pub mod profile;
pub mod profile_image;
pub mod token_store;

pub use error::ServiceError;
pub use images_list::{ImagesListService, PHOTOS_PER_PAGE};
pub use logout::LogoutService;
pub use oauth::OAuth2Service;
pub use profile::ProfileService;
pub use profile_image::ProfileImageService;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
