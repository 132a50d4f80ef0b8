/// Unsplash photo identifiers are opaque strings.
pub type PhotoId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
