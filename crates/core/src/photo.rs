//! View-ready photo model.
//!
//! A [`Photo`] is an immutable value. Mutations such as toggling the
//! like state build a new value via [`Photo::with_liked`] and replace the
//! old one wholesale.

use serde::Serialize;
use url::Url;

use crate::types::{PhotoId, Timestamp};

/// Original pixel dimensions of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
}

impl PhotoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` for a degenerate zero height.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }
}

/// A photo in the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    /// Unsplash identifier, unique within a feed.
    pub id: PhotoId,
    pub size: PhotoSize,
    /// `None` when the upstream timestamp could not be parsed.
    pub created_at: Option<Timestamp>,
    pub description: Option<String>,
    /// `None` when the upstream URL string was malformed.
    pub thumb_image_url: Option<Url>,
    /// `None` when the upstream URL string was malformed.
    pub full_image_url: Option<Url>,
    /// Whether the authenticated user likes this photo.
    pub is_liked: bool,
}

impl Photo {
    /// Copy of this photo with only the like state replaced.
    pub fn with_liked(&self, is_liked: bool) -> Self {
        Self {
            is_liked,
            ..self.clone()
        }
    }
}
