//! Liveness and storage health endpoints

use actix_web::{web, HttpResponse};
use ks_core::errors::{DomainError, StorageError};

use crate::app::AppState;
use crate::handlers::ApiError;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "keystone-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Handler for GET /health/storage
///
/// Pings the user store, bounded by the configured store timeout.
pub async fn storage_health(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let ping = tokio::time::timeout(state.store_timeout, state.users.ping()).await;

    match ping {
        Ok(Ok(())) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "storage": "reachable",
        }))),
        Ok(Err(e)) => {
            log::error!("Storage health check failed: {:?}", e);
            Err(e.into())
        }
        Err(_) => {
            let after_ms = state.store_timeout.as_millis() as u64;
            log::error!("Storage health check timed out after {}ms", after_ms);
            Err(DomainError::Storage(StorageError::Timeout { after_ms }).into())
        }
    }
}
