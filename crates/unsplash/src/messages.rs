//! Unsplash wire records.
//!
//! Unsplash sends snake_case JSON keys. Rust fields are snake_case too, so
//! serde's default naming is the whole decoding policy and no field needs
//! a rename. Only `id`, `width`, `height` and `urls` are hard requirements
//! for a photo; everything else tolerates absence.

use serde::Deserialize;

/// One element of the `GET /photos` response array.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoResult {
    pub id: String,
    pub width: u32,
    pub height: u32,
    /// ISO 8601 timestamp; parsed leniently by the mapper.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub urls: PhotoUrls,
    /// Total like count across all users. Not used to derive `is_liked`.
    #[serde(default)]
    pub likes: u32,
    /// Whether the authenticated user likes the photo.
    #[serde(default)]
    pub liked_by_user: bool,
}

/// Image URLs of a photo in several renditions.
///
/// Absent or `null` renditions decode as `None` so one bad record does not
/// sink the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoUrls {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

/// Response of `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResult {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Response of `GET /users/{username}`; only the avatar is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResult {
    pub profile_image: ProfileImage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub small: String,
    pub medium: String,
    pub large: String,
}

/// Response of `POST /oauth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponseBody {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub created_at: i64,
}
