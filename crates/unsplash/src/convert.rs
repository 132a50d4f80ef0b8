//! Conversion of wire records into view models.
//!
//! Conversion never fails: a malformed timestamp or URL degrades to `None`
//! on that field and the rest of the record is kept.

use chrono::{DateTime, Utc};
use imagefeed_core::photo::{Photo, PhotoSize};
use imagefeed_core::profile::Profile;
use imagefeed_core::types::Timestamp;
use url::Url;

use crate::messages::{PhotoResult, ProfileResult};

/// Convert one `GET /photos` record into a [`Photo`].
pub fn to_photo(result: PhotoResult) -> Photo {
    let created_at = result.created_at.as_deref().and_then(parse_created_at);
    let thumb_image_url = result.urls.thumb.as_deref().and_then(parse_url);
    let full_image_url = result.urls.full.as_deref().and_then(parse_url);

    if created_at.is_none() || thumb_image_url.is_none() || full_image_url.is_none() {
        tracing::debug!(
            photo_id = %result.id,
            created_at = ?result.created_at,
            "Photo record has malformed optional fields",
        );
    }

    Photo {
        id: result.id,
        size: PhotoSize::new(result.width, result.height),
        created_at,
        description: result.description,
        thumb_image_url,
        full_image_url,
        is_liked: result.liked_by_user,
    }
}

/// Convert a page of records, preserving upstream order.
pub fn to_photos(results: Vec<PhotoResult>) -> Vec<Photo> {
    results.into_iter().map(to_photo).collect()
}

/// Convert a `GET /me` response into a [`Profile`].
pub fn to_profile(result: ProfileResult) -> Profile {
    Profile::new(result.username, result.name.unwrap_or_default(), result.bio)
}

/// Parse an ISO 8601 internet date-time (e.g. `2016-05-03T11:00:28-04:00`).
pub fn parse_created_at(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an absolute URL.
pub fn parse_url(raw: &str) -> Option<Url> {
    Url::parse(raw).ok()
}
