use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use super::JsonDocument;
use super::USERS_FILE;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::FullName;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    username: String,
    /// Older files store the (bcrypt) hash under `password`.
    #[serde(alias = "password")]
    password_hash: String,
    full_name: String,
    role: String,
}

impl From<&User> for StoredUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.as_str().to_string(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.as_str().to_string(),
            role: user.role.as_str().to_string(),
        }
    }
}

impl StoredUser {
    fn load(&self) -> Result<User, UserError> {
        let user = || -> Result<User, UserError> {
            Ok(User {
                username: Username::new(self.username.clone())?,
                password_hash: self.password_hash.clone(),
                full_name: FullName::new(self.full_name.clone())?,
                role: self.role.parse()?,
            })
        };

        user().map_err(|e| {
            UserError::DatabaseError(format!("Invalid user record '{}': {}", self.username, e))
        })
    }
}

/// Credential store kept in `<data_dir>/users.json`.
pub struct JsonFileUserRepository {
    document: JsonDocument<StoredUser>,
}

impl JsonFileUserRepository {
    /// Open the credential store, failing when any stored record is invalid.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, UserError> {
        let document = JsonDocument::open(data_dir.as_ref().join(USERS_FILE)).await?;

        let count = document
            .read(|records| {
                records
                    .iter()
                    .map(StoredUser::load)
                    .collect::<Result<Vec<_>, _>>()
                    .map(|users| users.len())
            })
            .await?;

        tracing::info!(path = %document.path().display(), users = count, "Credential store opened");

        Ok(Self { document })
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let stored = StoredUser::from(&user);

        self.document
            .write(|records| {
                if records.iter().any(|r| r.username == stored.username) {
                    return Err(UserError::UsernameAlreadyExists(stored.username.clone()));
                }
                records.push(stored);
                Ok(())
            })
            .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.document
            .read(|records| {
                records
                    .iter()
                    .find(|r| r.username == username.as_str())
                    .map(StoredUser::load)
                    .transpose()
            })
            .await
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        self.document
            .read(|records| records.iter().map(StoredUser::load).collect())
            .await
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let stored = StoredUser::from(&user);

        self.document
            .write(|records| {
                let slot = records
                    .iter_mut()
                    .find(|r| r.username == stored.username)
                    .ok_or_else(|| UserError::NotFound(stored.username.clone()))?;
                *slot = stored;
                Ok::<_, UserError>(())
            })
            .await?;

        Ok(user)
    }

    async fn delete(&self, username: &Username) -> Result<(), UserError> {
        self.document
            .write(|records| {
                let index = records
                    .iter()
                    .position(|r| r.username == username.as_str())
                    .ok_or_else(|| UserError::NotFound(username.to_string()))?;
                records.remove(index);
                Ok(())
            })
            .await
    }
}
