//! HTTP API DTOs for the read-only introspection surface.

use serde::Serialize;

use crate::domain::{Room, RoomSummary, Scores, Symbol};

use super::websocket::PlayerDto;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub timestamp: i64,
}

/// Admin reset response body.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub ok: bool,
}

/// One entry of `GET /api/rooms`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub size: usize,
    pub win_len: usize,
    pub players: Vec<Symbol>,
    pub x_turn: bool,
    pub board_preview: Vec<Option<Symbol>>,
    pub scores: Scores,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            size: summary.size,
            win_len: summary.win_len,
            players: summary.players,
            x_turn: summary.x_turn,
            board_preview: summary.board_preview,
            scores: summary.scores,
        }
    }
}

/// Sanitized room snapshot for `GET /api/rooms/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomViewDto {
    pub id: String,
    pub size: usize,
    pub win_len: usize,
    pub board: Vec<Option<Symbol>>,
    pub players: Vec<PlayerDto>,
    pub x_turn: bool,
    pub creator_id: Option<String>,
    pub last_starter: Option<Symbol>,
    pub scores: Scores,
}

impl From<&Room> for RoomViewDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.to_string(),
            size: room.size,
            win_len: room.win_len,
            board: room.board.clone(),
            players: room.players.iter().map(PlayerDto::from).collect(),
            x_turn: room.x_turn,
            creator_id: room.creator.as_ref().map(|c| c.to_string()),
            last_starter: room.last_starter,
            scores: room.scores,
        }
    }
}

/// Wrapper for the room detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailResponse {
    pub room: RoomViewDto,
}
