//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    common::time::unix_timestamp_ms,
    domain::RoomId,
    infrastructure::dto::http::{
        HealthResponse, ResetResponse, RoomDetailResponse, RoomSummaryDto, RoomViewDto,
    },
    infrastructure::dto::websocket::ServerEvent,
    ui::state::AppState,
    usecase::ResetRoomUseCase,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        timestamp: unix_timestamp_ms(),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.store.list_rooms().await;
    Json(summaries.into_iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailResponse>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .store
        .get_room(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(RoomDetailResponse {
        room: RoomViewDto::from(&room),
    }))
}

/// Admin reset endpoint: clears a room's board without a creator check
pub async fn reset_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<ResetResponse>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let lock = state.room_lock(&room_id).await;
    let _guard = lock.lock().await;

    let usecase = ResetRoomUseCase::new(state.store.clone());
    let room = usecase
        .execute_admin(&room_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    // Connected clients learn about the admin reset the same way as a
    // player-initiated one
    state
        .broadcast(&room_id, &ServerEvent::board_update(&room))
        .await;
    state
        .broadcast(&room_id, &ServerEvent::players_updated(&room))
        .await;

    Ok(Json(ResetResponse { ok: true }))
}
