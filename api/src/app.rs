//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use ks_core::repositories::UserRepository;
use ks_core::services::{
    AuthService, AuthServiceConfig, AuthorizationService, KeyProvider, TokenService,
    TokenServiceConfig,
};
use ks_shared::config::{CorsConfig, Environment};
use ks_shared::{error_codes, AppConfig, ErrorResponse};

use crate::handlers::ApiError;
use crate::middleware::{cors::create_cors, JwtAuth, RequestIdMiddleware};
use crate::routes;

/// Access log line, tagged with the request id set on the response
const ACCESS_LOG_FORMAT: &str = r#"%{x-request-id}o %a "%r" %s %b %T"#;

/// Application state that holds shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub authorization: AuthorizationService,
    pub users: Arc<dyn UserRepository>,
    pub refresh_cookie_name: String,
    pub store_timeout: Duration,
    pub cors: CorsConfig,
    pub environment: Environment,
}

impl AppState {
    /// Wire the services from configuration, keys and a user store
    pub fn new(config: &AppConfig, keys: Arc<KeyProvider>, users: Arc<dyn UserRepository>) -> Self {
        Self::with_auth_config(config, keys, users, AuthServiceConfig::default())
    }

    /// Like [`AppState::new`] with explicit password handling settings
    pub fn with_auth_config(
        config: &AppConfig,
        keys: Arc<KeyProvider>,
        users: Arc<dyn UserRepository>,
        auth_config: AuthServiceConfig,
    ) -> Self {
        let tokens = TokenService::new(keys, TokenServiceConfig::from(&config.jwt));
        let store_timeout = Duration::from_millis(config.jwt.store_timeout_ms);

        Self {
            auth_service: AuthService::new(users.clone(), tokens.clone(), auth_config),
            authorization: AuthorizationService::new(tokens, users.clone(), store_timeout),
            users,
            refresh_cookie_name: config.jwt.refresh_cookie_name.clone(),
            store_timeout,
            cors: config.cors.clone(),
            environment: config.environment,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&app_state.cors, app_state.environment);
    let auth = JwtAuth::new(
        app_state.authorization.clone(),
        &app_state.refresh_cookie_name,
    );

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            log::info!("Rejected request body: {}", err);
            ApiError::InvalidRequest("request body is not valid JSON".to_string()).into()
        }))
        // Add middleware (CORS wraps the routes, then request ids, logging outermost)
        .wrap(cors)
        .wrap(RequestIdMiddleware)
        .wrap(Logger::new(ACCESS_LOG_FORMAT))
        // Health check endpoints
        .route("/health", web::get().to(routes::health::health_check))
        .route("/health/storage", web::get().to(routes::health::storage_health))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(routes::auth::register::register))
                    .route("/login", web::post().to(routes::auth::login::login))
                    .route(
                        "/authn",
                        web::get().to(routes::auth::authn::authn).wrap(auth),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
