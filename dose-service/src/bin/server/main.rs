use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::Authenticator;
use dose_service::config::BootstrapConfig;
use dose_service::config::Config;
use dose_service::config::StorageBackend;
use dose_service::domain::user::models::CreateUserCommand;
use dose_service::domain::user::models::FullName;
use dose_service::domain::user::models::Password;
use dose_service::domain::user::models::Role;
use dose_service::domain::user::models::Username;
use dose_service::domain::user::ports::UserServicePort;
use dose_service::inbound::http::router::create_router;
use dose_service::inbound::http::router::AppState;
use dose_service::outbound::repositories::JsonFileDrugRepository;
use dose_service::outbound::repositories::JsonFileUserRepository;
use dose_service::outbound::repositories::PostgresDrugRepository;
use dose_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_ADMIN_FULL_NAME: &str = "Administrator";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dose_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "dose-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        storage_backend = ?config.storage.backend,
        lookup_policy = ?config.calculator.lookup,
        previous_secrets = config.jwt.previous_secrets.len(),
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_previous_secrets(&config.jwt.previous_secrets)
            .with_expiration_hours(config.jwt.expiration_hours),
    );

    let state = match config.storage.backend {
        StorageBackend::Json => {
            let data_dir = &config.storage.data_dir;
            let user_repository = Arc::new(JsonFileUserRepository::open(data_dir).await?);
            let drug_repository = Arc::new(JsonFileDrugRepository::open(data_dir).await?);
            tracing::info!(
                data_dir = %data_dir.display(),
                storage = "json",
                "Stores opened"
            );

            AppState::new(
                user_repository,
                drug_repository,
                authenticator,
                config.calculator.lookup,
            )
        }
        StorageBackend::Postgres => {
            let database_url = config
                .storage
                .database_url
                .as_deref()
                .context("storage.database_url is required for the postgres backend")?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(config.storage.max_connections)
                .connect(database_url)
                .await?;
            tracing::info!(
                max_connections = config.storage.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresDrugRepository::new(pg_pool)),
                authenticator,
                config.calculator.lookup,
            )
        }
    };

    bootstrap_admin(&state, &config.bootstrap).await?;

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

/// Create the configured admin account when no account exists yet.
async fn bootstrap_admin(state: &AppState, bootstrap: &BootstrapConfig) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (&bootstrap.admin_username, &bootstrap.admin_password)
    else {
        tracing::debug!("No bootstrap admin configured");
        return Ok(());
    };

    let full_name = bootstrap
        .admin_full_name
        .clone()
        .unwrap_or_else(|| DEFAULT_ADMIN_FULL_NAME.to_string());

    let command = CreateUserCommand::new(
        Username::new(username.clone()).context("Invalid bootstrap.admin_username")?,
        Password::new(password.clone()).context("Invalid bootstrap.admin_password")?,
        FullName::new(full_name).context("Invalid bootstrap.admin_full_name")?,
        Role::Admin,
    );

    match state.user_service.bootstrap_admin(command).await? {
        Some(admin) => tracing::warn!(
            username = %admin.username,
            "Bootstrap admin created; change its password"
        ),
        None => tracing::debug!("Credential store not empty, bootstrap skipped"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
