use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// Carries the identity of the authenticated principal. Role is kept as a
/// plain string so each service can map it onto its own role type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username of the principal (unique account key), carried as `sub`
    #[serde(rename = "sub")]
    pub username: String,

    /// Access tier of the principal
    pub role: String,

    /// Display name of the principal
    #[serde(rename = "fullName")]
    pub full_name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a session that expires after `expiration_hours`.
    ///
    /// # Arguments
    /// * `username` - Account key of the principal
    /// * `role` - Role name of the principal
    /// * `full_name` - Display name of the principal
    /// * `expiration_hours` - Hours until the token expires
    pub fn for_session(
        username: impl ToString,
        role: impl ToString,
        full_name: impl ToString,
        expiration_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(expiration_hours);

        Self {
            username: username.to_string(),
            role: role.to_string(),
            full_name: full_name.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Override the expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if the session is expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
