use axum::{
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};

use crate::{
    handlers::{
        health_check,
        messages::{create_message, delete_message, get_message, list_messages, update_message},
        storage_health_check,
    },
    middleware::create_middleware_stack,
    service::MessageService,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(service: Arc<MessageService>, request_timeout: Duration) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health_check))
        .route("/health/db", get(storage_health_check))
        // Message endpoints
        .route("/messages", post(create_message).get(list_messages))
        .route(
            "/messages/:id",
            get(get_message).patch(update_message).delete(delete_message),
        )
        .with_state(service)
        .layer(create_middleware_stack(request_timeout))
}
