// Handlers module
// HTTP handlers for the REST API

pub mod messages;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::{error::ApiError, service::MessageService};

/// Liveness probe
/// Returns "OK" with 200 status for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: succeeds only when the store answers
pub async fn storage_health_check(
    State(service): State<Arc<MessageService>>,
) -> Result<impl IntoResponse, ApiError> {
    service.ping().await?;
    Ok((StatusCode::OK, "OK"))
}
