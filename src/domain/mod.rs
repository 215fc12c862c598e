//! Domain layer for the room coordinator.
//!
//! This module contains the game's business logic (rooms, boards, turn
//! order, win detection) independent of data transfer objects and
//! infrastructure concerns.

pub mod board;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use board::{evaluate, LineCell, Verdict};
pub use entity::{ChatMessage, Player, Room, RoomOptions, Scores};
pub use error::{RoomError, ValueObjectError};
pub use repository::{CreateRoomOutcome, RoomStore, RoomSummary};
#[cfg(test)]
pub use repository::MockRoomStore;
pub use value_object::{ClientId, PlayerName, RoomId, Symbol, Timestamp};
