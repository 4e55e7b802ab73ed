use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;

/// Port for account management operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user with a hashed password.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Storage operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `DatabaseError` - Storage operation failed
    async fn get_user(&self, username: &Username) -> Result<User, UserError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Update profile fields of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn update_user(
        &self,
        username: &Username,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn delete_user(&self, username: &Username) -> Result<(), UserError>;

    /// Replace a user's password without knowing the current one (administrative).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Storage operation failed
    async fn reset_password(&self, username: &Username, new_password: Password)
        -> Result<(), UserError>;

    /// Replace a user's own password after verifying the current one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `InvalidCredentials` - Current password does not match
    /// * `Password` - Hashing or verification failed
    /// * `DatabaseError` - Storage operation failed
    async fn change_password(
        &self,
        username: &Username,
        current_password: &str,
        new_password: Password,
    ) -> Result<(), UserError>;

    /// Create the initial administrator when no account exists yet.
    ///
    /// # Returns
    /// The created admin, or `None` when accounts already exist
    ///
    /// # Errors
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Storage operation failed
    async fn bootstrap_admin(&self, command: CreateUserCommand)
        -> Result<Option<User>, UserError>;
}

/// Persistence operations for the credential store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Storage operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Replace an existing user record.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn delete(&self, username: &Username) -> Result<(), UserError>;
}
