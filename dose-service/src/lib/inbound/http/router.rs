use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::calculate_dose::calculate_dose;
use super::handlers::drugs::create_drug::create_drug;
use super::handlers::drugs::delete_drug::delete_drug;
use super::handlers::drugs::get_drug::get_drug;
use super::handlers::drugs::list_drugs::list_drugs;
use super::handlers::drugs::update_drug::update_drug;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::users::change_password::change_password;
use super::handlers::users::create_user::create_user;
use super::handlers::users::delete_user::delete_user;
use super::handlers::users::get_user::get_user;
use super::handlers::users::list_users::list_users;
use super::handlers::users::reset_password::reset_password;
use super::handlers::users::update_user::update_user;
use super::middleware::require_admin;
use super::middleware::require_user;
use crate::domain::dose::models::LookupPolicy;
use crate::domain::dose::ports::DoseCalculatorPort;
use crate::domain::dose::service::DoseCalculator;
use crate::domain::drug::ports::DrugRepository;
use crate::domain::drug::ports::DrugServicePort;
use crate::domain::drug::service::DrugService;
use crate::domain::session::ports::AuthServicePort;
use crate::domain::session::service::AuthService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub drug_service: Arc<dyn DrugServicePort>,
    pub dose_calculator: Arc<dyn DoseCalculatorPort>,
}

impl AppState {
    /// Wire every domain service over the given stores.
    pub fn new<UR, DR>(
        user_repository: Arc<UR>,
        drug_repository: Arc<DR>,
        authenticator: Arc<Authenticator>,
        lookup_policy: LookupPolicy,
    ) -> Self
    where
        UR: UserRepository,
        DR: DrugRepository,
    {
        Self {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&user_repository),
                authenticator,
            )),
            user_service: Arc::new(UserService::new(user_repository)),
            drug_service: Arc::new(DrugService::new(Arc::clone(&drug_repository))),
            dose_calculator: Arc::new(DoseCalculator::new(drug_repository, lookup_policy)),
        }
    }
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/login", post(login));

    let user_routes = Router::new()
        .route("/api/drugs", get(list_drugs))
        .route("/api/drugs/:id", get(get_drug))
        .route("/api/calculate", post(calculate_dose))
        .route("/api/users/change-password", put(change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let admin_routes = Router::new()
        .route("/api/drugs", post(create_drug))
        .route("/api/drugs/:id", put(update_drug).delete(delete_drug))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:username",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/:username/reset-password", put(reset_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
