// Message handlers
// HTTP handlers for message CRUD and listing

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::ApiError,
    models::message::{parse_message_id, CreateMessageRequest, UpdateMessageRequest},
    pagination::{ListMessagesQuery, PageRequest},
    service::MessageService,
};

/// Create a new message
/// POST /messages
pub async fn create_message(
    State(service): State<Arc<MessageService>>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("Creating new message ({} characters)", request.content.chars().count());

    let message = service.create(request).await?;

    info!("Successfully created message with id: {}", message.id);
    Ok((StatusCode::CREATED, Json(message)))
}

/// Get message by ID
/// GET /messages/:id
pub async fn get_message(
    State(service): State<Arc<MessageService>>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_message_id(&raw_id).map_err(ApiError::validation)?;
    info!("Fetching message with id: {}", id);

    let message = service.get(id).await?;

    Ok((StatusCode::OK, Json(message)))
}

/// Update message content by ID
/// PATCH /messages/:id
pub async fn update_message(
    State(service): State<Arc<MessageService>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_message_id(&raw_id).map_err(ApiError::validation)?;
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection @ JsonRejection::MissingJsonContentType(_)) => return Err(rejection.into()),
        Err(rejection) => {
            // An unknown id wins over a malformed body
            service.get(id).await?;
            return Err(rejection.into());
        }
    };
    info!("Updating message with id: {}", id);

    let message = service.update(id, request).await?;

    info!("Successfully updated message with id: {}", id);
    Ok((StatusCode::OK, Json(message)))
}

/// Delete message by ID
/// DELETE /messages/:id
pub async fn delete_message(
    State(service): State<Arc<MessageService>>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_message_id(&raw_id).map_err(ApiError::validation)?;
    info!("Deleting message with id: {}", id);

    service.delete(id).await?;

    info!("Successfully deleted message with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// List messages page by page
/// GET /messages?page=<n>&limit=<n>
pub async fn list_messages(
    State(service): State<Arc<MessageService>>,
    query: Result<Query<ListMessagesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let page = PageRequest::from_query(&params).map_err(ApiError::validation)?;
    info!("Listing messages: page {} with limit {}", page.page(), page.limit());

    let response = service.list(page).await?;

    info!(
        "Retrieved {} of {} messages",
        response.messages.len(),
        response.pagination.total_messages
    );
    Ok((StatusCode::OK, Json(response)))
}
