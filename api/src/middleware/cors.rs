//! CORS middleware configuration for cross-origin requests.
//!
//! Development allows any origin. Other environments only allow the origins
//! listed in [`CorsConfig::allowed_origins`].

use actix_cors::Cors;
use actix_web::http::{header, Method};
use ks_shared::config::{CorsConfig, Environment};

/// Creates a CORS middleware instance configured for the environment.
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_development() {
        create_development_cors(config.max_age)
    } else {
        create_production_cors(config)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
        // Rotated access tokens come back in this header
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(max_age)
        .supports_credentials()
}

fn create_production_cors(config: &CorsConfig) -> Cors {
    log::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(config.max_age)
        .supports_credentials();

    for origin in config.allowed_origins.iter().map(|s| s.trim()) {
        if !origin.is_empty() {
            log::info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
