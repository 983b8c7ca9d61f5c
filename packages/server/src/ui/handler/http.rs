//! HTTP API endpoint handlers.
//!
//! 掲示板の状態を JSON で参照するための読み取り専用 API。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::BoardError,
    infrastructure::dto::http::{GroupDetailDto, GroupSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get registered handles
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let users = state.board_query_usecase.users().await;
    Json(users.into_iter().map(|h| h.into_string()).collect())
}

/// Get list of groups
pub async fn get_groups(State(state): State<Arc<AppState>>) -> Json<Vec<GroupSummaryDto>> {
    let snapshots = state.board_query_usecase.channel_snapshots().await;

    // Domain Model から DTO への変換
    Json(snapshots.into_iter().map(GroupSummaryDto::from).collect())
}

/// Get group detail by name
pub async fn get_group_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<GroupDetailDto>, StatusCode> {
    match state.board_query_usecase.channel_snapshot(&name).await {
        Ok(snapshot) => Ok(Json(GroupDetailDto::from(snapshot))),
        Err(BoardError::NoSuchChannel(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to read group '{}': {}", name, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
