use serde::Serialize;

/// The authenticated user's profile as shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub username: String,
    pub name: String,
    /// `@username`.
    pub login_name: String,
    pub bio: Option<String>,
}

impl Profile {
    pub fn new(username: impl Into<String>, name: impl Into<String>, bio: Option<String>) -> Self {
        let username = username.into();
        Self {
            login_name: format!("@{username}"),
            username,
            name: name.into(),
            bio,
        }
    }
}
