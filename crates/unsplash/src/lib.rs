//! Unsplash REST client library.
//!
//! Provides the fetch-and-decode helper with its error taxonomy, typed
//! wire records, conversion into view models, OAuth helpers, and the
//! [`source::PhotoSource`] seam the feed service pages through.

pub mod api;
pub mod config;
pub mod convert;
pub mod messages;
pub mod oauth;
pub mod source;

pub use api::{ApiRequest, HttpMethod, UnsplashApi, UnsplashApiError};
pub use config::{ConfigError, UnsplashConfig};
pub use source::PhotoSource;
