//! Chat proxy route.

use axum::{Json, Router, extract::State, routing::post};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use regdesk_core::chat::{ChatReply, ChatRequest, prepare_conversation};
use regdesk_shared::ChatError;

/// Creates the chat router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// POST /chat - Forward a validated conversation to the chat model.
async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let turns = prepare_conversation(&request.messages, state.chat.system_prompt())?;
    if !state.chat.is_enabled() {
        return Err(ChatError::NotConfigured.into());
    }

    debug!(turns = turns.len(), "Forwarding chat conversation");
    let reply = state.chat.complete(&turns).await?;
    Ok(Json(ChatReply { reply }))
}
