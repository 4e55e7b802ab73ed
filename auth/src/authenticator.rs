use serde::Deserialize;
use serde::Serialize;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    expiration_hours: i64,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Default session lifetime in hours.
    pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

    /// Create a new authenticator signing with `jwt_secret`.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            expiration_hours: Self::DEFAULT_EXPIRATION_HOURS,
        }
    }

    /// Keep accepting tokens signed with retired secrets.
    pub fn with_previous_secrets<I, S>(mut self, secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.jwt_handler = self.jwt_handler.with_previous_secrets(secrets);
        self
    }

    /// Set the lifetime of issued sessions.
    pub fn with_expiration_hours(mut self, expiration_hours: i64) -> Self {
        self.expiration_hours = expiration_hours;
        self
    }

    /// Lifetime of issued sessions in hours.
    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Whether a stored hash should be replaced by a fresh Argon2id hash.
    pub fn needs_rehash(&self, stored_hash: &str) -> bool {
        self.password_hasher.needs_rehash(stored_hash)
    }

    /// Verify credentials and issue a token for `claims`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate<T: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &T,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `JwtError` - Token is expired, malformed or signed with an unknown secret
    pub fn validate_token<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::Claims;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET);
        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let claims = Claims::for_session("alice", "admin", "Alice Doe", 1);
        let result = authenticator
            .authenticate("my_password", &hash, &claims)
            .expect("Authentication failed");

        let decoded: Claims = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET);
        let hash = authenticator.hash_password("my_password").unwrap();
        let claims = Claims::for_session("alice", "user", "Alice", 1);

        let result = authenticator.authenticate("wrong_password", &hash, &claims);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_expiration_hours() {
        let authenticator = Authenticator::new(SECRET);
        assert_eq!(
            authenticator.expiration_hours(),
            Authenticator::DEFAULT_EXPIRATION_HOURS
        );

        let authenticator = authenticator.with_expiration_hours(8);
        assert_eq!(authenticator.expiration_hours(), 8);
    }

    #[test]
    fn test_rotated_secret_still_validates() {
        let old = Authenticator::new(b"old_secret_key_at_least_32_bytes_long");
        let token = old
            .generate_token(&Claims::for_session("bob", "user", "Bob", 1))
            .unwrap();

        let current = Authenticator::new(b"new_secret_key_at_least_32_bytes_long")
            .with_previous_secrets(["old_secret_key_at_least_32_bytes_long"]);
        let decoded: Claims = current.validate_token(&token).unwrap();

        assert_eq!(decoded.username, "bob");
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.validate_token::<Claims>("invalid.token.here");
        assert!(result.is_err());
    }
}
