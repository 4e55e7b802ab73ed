use async_trait::async_trait;

use crate::domain::session::errors::AuthError;
use crate::domain::session::models::Principal;
use crate::domain::session::models::SessionToken;
use crate::domain::user::models::Role;

/// Port for authentication (login) and authorization (request gate).
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// * `NotFound` - No account with this username
    /// * `InvalidCredential` - Password does not match
    /// * `Internal` - Storage, hashing or signing failure
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<SessionToken, AuthError>;

    /// Validate a presented token and check the caller's role.
    ///
    /// # Arguments
    /// * `token` - Raw token, `None` when the request carried none
    /// * `required_role` - Role the caller must hold, `None` for any valid session
    ///
    /// # Errors
    /// * `MissingToken` - No token presented
    /// * `InvalidToken` - Bad signature, structure, expiry or role claim
    /// * `Forbidden` - Role does not match `required_role`
    fn authorize(
        &self,
        token: Option<&str>,
        required_role: Option<Role>,
    ) -> Result<Principal, AuthError>;
}
