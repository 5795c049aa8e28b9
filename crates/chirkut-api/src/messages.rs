use axum::{
    Json,
    response::{IntoResponse, Response},
};
use tracing::debug;

use chirkut_types::api::{Ack, DeleteMessageRequest, SendMessageRequest};
use chirkut_types::models::InboxMessage;

use crate::{AppState, ApiError, run_blocking};

/// Anyone may post to any handle, registered or not.
pub async fn send_message(state: &AppState, req: SendMessageRequest) -> Result<Response, ApiError> {
    let id = run_blocking(state, move |db| Ok(db.insert_message(&req.to, &req.content)?)).await?;
    debug!("Stored message {}", id);

    Ok(Json(Ack::ok()).into_response())
}

// No ownership check: whoever names the username reads the inbox.
pub async fn get_messages(state: &AppState, username: String) -> Result<Response, ApiError> {
    let rows = run_blocking(state, move |db| Ok(db.get_messages(&username)?)).await?;

    let messages: Vec<InboxMessage> = rows
        .into_iter()
        .map(|row| InboxMessage {
            id: row.id,
            content: row.content,
            timestamp: row.created_at,
            is_read: row.is_read,
        })
        .collect();

    Ok(Json(messages).into_response())
}

/// Deleting an id that does not exist still succeeds.
pub async fn delete_message(
    state: &AppState,
    req: DeleteMessageRequest,
) -> Result<Response, ApiError> {
    if let Some(id) = req.id {
        let removed = run_blocking(state, move |db| Ok(db.delete_message(id)?)).await?;
        debug!("Deleted message {} ({} rows)", id, removed);
    }

    Ok(Json(Ack::ok()).into_response())
}
