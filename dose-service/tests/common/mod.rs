use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::Claims;
use dose_service::domain::dose::models::LookupPolicy;
use dose_service::domain::user::models::FullName;
use dose_service::domain::user::models::Role;
use dose_service::domain::user::models::User;
use dose_service::domain::user::models::Username;
use dose_service::domain::user::ports::UserRepository;
use dose_service::inbound::http::router::create_router;
use dose_service::inbound::http::router::AppState;
use dose_service::outbound::repositories::JsonFileDrugRepository;
use dose_service::outbound::repositories::JsonFileUserRepository;
use serde_json::json;
use serde_json::Value;
use tempfile::TempDir;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PREVIOUS_JWT_SECRET: &[u8] = b"retired-secret-key-for-jwt-signing-32-bytes";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin_pass!";
pub const USER_USERNAME: &str = "nurse";
pub const USER_PASSWORD: &str = "nurse_pass!";

/// Test application that spawns a real server over a JSON store in a temporary directory
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub data_dir: TempDir,
}

impl TestApp {
    /// Spawn the application with strict drug lookup
    pub async fn spawn() -> Self {
        Self::spawn_with(LookupPolicy::Strict).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(lookup_policy: LookupPolicy) -> Self {
        let data_dir = TempDir::new().expect("Failed to create data directory");
        Self::spawn_in(data_dir, lookup_policy).await
    }

    /// Spawn the application over an existing data directory, adding the seed accounts
    pub async fn spawn_in(data_dir: TempDir, lookup_policy: LookupPolicy) -> Self {
        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET).with_previous_secrets([PREVIOUS_JWT_SECRET]),
        );

        let user_repository = Arc::new(
            JsonFileUserRepository::open(data_dir.path())
                .await
                .expect("Failed to open user store"),
        );
        let drug_repository = Arc::new(
            JsonFileDrugRepository::open(data_dir.path())
                .await
                .expect("Failed to open drug store"),
        );

        seed_user(&*user_repository, &authenticator, ADMIN_USERNAME, ADMIN_PASSWORD, Role::Admin)
            .await;
        seed_user(&*user_repository, &authenticator, USER_USERNAME, USER_PASSWORD, Role::User)
            .await;

        let state = AppState::new(
            user_repository,
            drug_repository,
            authenticator,
            lookup_policy,
        );
        let router = create_router(state, Duration::from_secs(30));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            data_dir,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Log in and return the issued token, panicking unless the login succeeds
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in login response")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn user_token(&self) -> String {
        self.login(USER_USERNAME, USER_PASSWORD).await
    }

    /// Add a drug through the API as admin and return the created record
    pub async fn create_drug(&self, drug: Value) -> Value {
        let token = self.admin_token().await;
        let response = self
            .post("/api/drugs")
            .bearer_auth(token)
            .json(&drug)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        response.json().await.expect("Failed to parse response")
    }
}

/// Sign a token directly, bypassing login
pub fn sign_token(secret: &[u8], claims: &Claims) -> String {
    Authenticator::new(secret)
        .generate_token(claims)
        .expect("Failed to sign token")
}

async fn seed_user(
    repository: &JsonFileUserRepository,
    authenticator: &Authenticator,
    username: &str,
    password: &str,
    role: Role,
) {
    let user = User {
        username: Username::new(username.to_string()).unwrap(),
        password_hash: authenticator.hash_password(password).unwrap(),
        full_name: FullName::new(format!("{} account", username)).unwrap(),
        role,
    };

    repository
        .create(user)
        .await
        .expect("Failed to seed user");
}
