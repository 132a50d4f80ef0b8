//! Domain types shared by every ImageFeed crate.

pub mod photo;
pub mod profile;
pub mod types;
