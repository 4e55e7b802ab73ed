use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::session::errors::AuthError;
use crate::domain::session::models::Principal;
use crate::domain::session::models::SessionToken;
use crate::domain::session::ports::AuthServicePort;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Stateless auth service: each call depends only on stored credentials and the presented token.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Replace a legacy hash after a successful login. Failure keeps the old
    /// hash, which still verifies, so the login itself is not affected.
    async fn upgrade_hash(&self, mut user: User, password: &str) {
        let hash = match self.authenticator.hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(username = %user.username, error = %e, "Password rehash failed");
                return;
            }
        };

        user.password_hash = hash;
        match self.repository.update(user).await {
            Ok(user) => tracing::info!(username = %user.username, "Legacy password hash upgraded"),
            Err(e) => tracing::warn!(error = %e, "Failed to store upgraded password hash"),
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, AuthError> {
        // A name that fails validation cannot belong to any account.
        let username = Username::new(username.to_string())
            .map_err(|_| AuthError::NotFound(username.to_string()))?;

        let user = self
            .repository
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AuthError::NotFound(username.to_string()))?;

        let claims = Claims::for_session(
            user.username.as_str(),
            user.role.as_str(),
            user.full_name.as_str(),
            self.authenticator.expiration_hours(),
        );

        let result = self
            .authenticator
            .authenticate(password, &user.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AuthError::InvalidCredential,
                AuthenticationError::PasswordError(err) => {
                    AuthError::Internal(format!("Password verification failed: {}", err))
                }
                AuthenticationError::JwtError(err) => {
                    AuthError::Internal(format!("Token generation failed: {}", err))
                }
            })?;

        if self.authenticator.needs_rehash(&user.password_hash) {
            self.upgrade_hash(user.clone(), password).await;
        }

        tracing::info!(username = %user.username, role = %user.role, "Session issued");

        Ok(SessionToken::new(result.access_token))
    }

    fn authorize(
        &self,
        token: Option<&str>,
        required_role: Option<Role>,
    ) -> Result<Principal, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims: Claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let principal = Principal {
            username: claims.username,
            role,
            full_name: claims.full_name,
        };

        match required_role {
            Some(required) if required != principal.role => Err(AuthError::Forbidden {
                required,
                actual: principal.role,
            }),
            _ => Ok(principal),
        }
    }
}
