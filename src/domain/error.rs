//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::{RoomId, Symbol};

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientId validation error
    #[error("ClientId cannot be empty")]
    ClientIdEmpty,

    /// ClientId too long error
    #[error("ClientId cannot exceed {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// PlayerName validation error
    #[error("PlayerName cannot be empty")]
    PlayerNameEmpty,

    /// PlayerName too long error
    #[error("PlayerName cannot exceed {max} characters (got {actual})")]
    PlayerNameTooLong { max: usize, actual: usize },
}

/// Request-scoped validation failures for room operations.
///
/// All of these surface as a rejection to the single requesting connection;
/// none of them mutates room state and none is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// Room already holds the maximum number of players
    #[error("Room full")]
    RoomFull { capacity: usize },

    /// Room does not exist
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// Cell index outside the board
    #[error("Invalid index {index} for board of {cells} cells")]
    InvalidIndex { index: i64, cells: usize },

    /// Requesting connection is not a registered player of the room
    #[error("Not a player in this room")]
    NotAPlayer,

    /// Claimed symbol differs from the one assigned to the player
    #[error("Symbol {claimed} is not yours (assigned: {assigned})")]
    SymbolMismatch { claimed: Symbol, assigned: Symbol },

    /// Move arrived out of turn
    #[error("Not your turn: {0} is to move")]
    NotYourTurn(Symbol),

    /// Target cell already holds a symbol
    #[error("Cell {0} already occupied")]
    CellOccupied(usize),

    /// Reset attempted by a connection other than the room creator
    #[error("Only the room creator can reset the board")]
    NotCreator,
}
