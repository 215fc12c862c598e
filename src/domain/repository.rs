//! Store abstraction owned by the domain layer.
//!
//! Every other component accesses room state only through this operation
//! set; no component reaches into another room's internals directly. The
//! trait is implemented by the in-memory store in the infrastructure layer
//! (dependency inversion).

use async_trait::async_trait;
use serde::Serialize;

use super::{
    entity::{ChatMessage, Room, RoomOptions, Scores},
    error::RoomError,
    value_object::{ClientId, PlayerName, RoomId, Symbol},
};

/// Result of a get-or-create lookup, tagged so callers can distinguish new
/// rooms from existing ones.
#[derive(Debug, Clone)]
pub struct CreateRoomOutcome {
    pub created: bool,
    pub room: Room,
}

/// Read-only room summary for monitoring; never exposes connection ids.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub size: usize,
    pub win_len: usize,
    /// Symbols currently seated, in join order
    pub players: Vec<Symbol>,
    pub x_turn: bool,
    /// First cells of the board, truncated for large grids
    pub board_preview: Vec<Option<Symbol>>,
    pub scores: Scores,
}

/// Authoritative mapping of room identifier to room state.
///
/// Implementations must make each operation atomic with respect to the
/// others (one lock per store or per room), since handlers on a
/// multi-threaded runtime may target the same room concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Get-or-create a room. Existing rooms are returned unchanged and the
    /// supplied options are discarded.
    async fn create_room(&self, id: RoomId, options: RoomOptions) -> CreateRoomOutcome;

    async fn get_room(&self, id: &RoomId) -> Option<Room>;

    /// Register a connection as a player, assigning a symbol.
    async fn add_player(
        &self,
        id: &RoomId,
        conn_id: ClientId,
        name: Option<PlayerName>,
    ) -> Result<Symbol, RoomError>;

    /// Remove a player, transfer the creator privilege if needed and delete
    /// the room once its player set is empty. Returns the surviving room,
    /// or None when the room was destroyed (or never existed).
    async fn remove_player(&self, id: &RoomId, conn_id: &ClientId) -> Option<Room>;

    /// Validate and apply a move, returning the updated room.
    async fn apply_move(
        &self,
        id: &RoomId,
        conn_id: &ClientId,
        index: i64,
        symbol: Symbol,
    ) -> Result<Room, RoomError>;

    /// Bump the win counter for a symbol. No-op on a missing room.
    async fn increment_score(&self, id: &RoomId, symbol: Symbol);

    /// Clear the board for a new game with alternating starter.
    async fn reset_room(&self, id: &RoomId) -> Result<Room, RoomError>;

    /// Append a chat message to the room's bounded log. The sending
    /// connection must be a registered player at append time, checked in
    /// the same lock span as the append.
    async fn add_message(
        &self,
        id: &RoomId,
        conn_id: &ClientId,
        message: ChatMessage,
    ) -> Result<ChatMessage, RoomError>;

    /// Chat history for a room, oldest first. Empty for missing rooms.
    async fn get_messages(&self, id: &RoomId) -> Vec<ChatMessage>;

    /// Summaries of all live rooms for monitoring.
    async fn list_rooms(&self) -> Vec<RoomSummary>;
}
