//! Bot webhook handler

use axum::{Json, extract::State};

use crate::bot::{self, BotReply, BotUpdate};
use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/bot/update - bot 平台消息回调
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<BotUpdate>,
) -> AppResult<Json<BotReply>> {
    let reply = bot::handle_update(&state, payload).await?;
    Ok(Json(reply))
}
