use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::errors::PasswordError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for account management.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn hash(&self, password: &Password) -> Result<String, UserError> {
        self.password_hasher
            .hash(password.expose())
            .map_err(|e| UserError::Password(PasswordError::HashingFailed(e.to_string())))
    }

    async fn find_existing(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let user = User {
            password_hash: self.hash(&command.password)?,
            username: command.username,
            full_name: command.full_name,
            role: command.role,
        };

        let created = self.repository.create(user).await?;
        tracing::info!(username = %created.username, role = %created.role, "User created");

        Ok(created)
    }

    async fn get_user(&self, username: &Username) -> Result<User, UserError> {
        self.find_existing(username).await
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(
        &self,
        username: &Username,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.find_existing(username).await?;

        if let Some(full_name) = command.full_name {
            user.full_name = full_name;
        }

        if let Some(role) = command.role {
            user.role = role;
        }

        let updated = self.repository.update(user).await?;
        tracing::info!(username = %updated.username, role = %updated.role, "User updated");

        Ok(updated)
    }

    async fn delete_user(&self, username: &Username) -> Result<(), UserError> {
        self.repository.delete(username).await?;
        tracing::info!(username = %username, "User deleted");
        Ok(())
    }

    async fn reset_password(
        &self,
        username: &Username,
        new_password: Password,
    ) -> Result<(), UserError> {
        let mut user = self.find_existing(username).await?;
        user.password_hash = self.hash(&new_password)?;

        self.repository.update(user).await?;
        tracing::info!(username = %username, "Password reset");

        Ok(())
    }

    async fn change_password(
        &self,
        username: &Username,
        current_password: &str,
        new_password: Password,
    ) -> Result<(), UserError> {
        let mut user = self.find_existing(username).await?;

        let matches = self
            .password_hasher
            .verify(current_password, &user.password_hash)
            .map_err(|e| UserError::Password(PasswordError::VerificationFailed(e.to_string())))?;
        if !matches {
            tracing::warn!(username = %username, "Password change rejected: wrong current password");
            return Err(UserError::InvalidCredentials);
        }

        user.password_hash = self.hash(&new_password)?;
        self.repository.update(user).await?;
        tracing::info!(username = %username, "Password changed");

        Ok(())
    }

    async fn bootstrap_admin(
        &self,
        command: CreateUserCommand,
    ) -> Result<Option<User>, UserError> {
        if !self.repository.list_all().await?.is_empty() {
            return Ok(None);
        }

        self.create_user(command).await.map(Some)
    }
}
