//! Core domain models for the room coordinator.

use std::collections::VecDeque;

use serde::Serialize;

use super::{
    board::{self, DEFAULT_SIZE, MIN_SIZE, MIN_WIN_LEN},
    error::RoomError,
    value_object::{ClientId, PlayerName, RoomId, Symbol, Timestamp},
};

/// Maximum number of players allowed in a room
pub const MAX_PLAYERS: usize = 2;

/// Maximum number of chat messages retained per room (oldest evicted)
pub const MESSAGE_CAPACITY: usize = 200;

/// Number of leading board cells included in monitoring summaries
pub const BOARD_PREVIEW_CELLS: usize = 25;

/// Options supplied when a room is first created; ignored on later joins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomOptions {
    pub size: Option<usize>,
    pub win_len: Option<usize>,
}

/// Per-symbol win counters, preserved across board resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scores {
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "O")]
    pub o: u32,
}

impl Scores {
    pub fn increment(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::X => self.x += 1,
            Symbol::O => self.o += 1,
        }
    }

    pub fn get(&self, symbol: Symbol) -> u32 {
        match symbol {
            Symbol::X => self.x,
            Symbol::O => self.o,
        }
    }
}

/// A player registered in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Connection identifier owning this seat
    pub id: ClientId,
    /// Assigned marker, unique within the room
    pub symbol: Symbol,
    /// Display name supplied at join time
    pub name: Option<PlayerName>,
}

/// A chat message stored in a room's bounded log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Deterministic id derived from connection id and submission time
    pub id: String,
    /// Sender display name as supplied by the client
    pub sender: String,
    pub text: Option<String>,
    pub media_url: Option<String>,
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message.
    ///
    /// The id combines the sending connection's identifier with the
    /// submission timestamp, which is unique per connection without a
    /// central counter.
    pub fn new(
        conn_id: &ClientId,
        sender: String,
        text: Option<String>,
        media_url: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: format!("{}-{}", conn_id, created_at),
            sender,
            text,
            media_url,
            created_at,
        }
    }
}

/// An isolated game+chat session holding one board and up to two players.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: RoomId,
    /// Board side length, always >= 3
    pub size: usize,
    /// Run length required to win, always in [3, size]
    pub win_len: usize,
    /// Row-major cells, length exactly size * size
    pub board: Vec<Option<Symbol>>,
    /// Registered players in join order (at most MAX_PLAYERS)
    pub players: Vec<Player>,
    pub scores: Scores,
    /// true ⇒ X to move
    pub x_turn: bool,
    /// Connection currently holding room-admin privilege
    pub creator: Option<ClientId>,
    /// Symbol that started the previous game, for starter alternation
    pub last_starter: Option<Symbol>,
    /// Bounded chat log, newest last
    pub messages: VecDeque<ChatMessage>,
}

impl Room {
    /// Create a new empty room, clamping size and win length into range.
    pub fn new(id: RoomId, options: RoomOptions) -> Self {
        let size = options.size.unwrap_or(DEFAULT_SIZE).max(MIN_SIZE);
        let win_len = options
            .win_len
            .unwrap_or(MIN_WIN_LEN)
            .clamp(MIN_WIN_LEN, size);
        Self {
            id,
            size,
            win_len,
            board: board::empty_board(size),
            players: Vec::new(),
            scores: Scores::default(),
            x_turn: true,
            creator: None,
            last_starter: None,
            messages: VecDeque::new(),
        }
    }

    /// Get a player by connection id.
    pub fn player(&self, conn_id: &ClientId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == conn_id)
    }

    /// Get the player holding the given symbol, if any.
    pub fn player_with_symbol(&self, symbol: Symbol) -> Option<&Player> {
        self.players.iter().find(|p| p.symbol == symbol)
    }

    /// Whether the room has no players and is eligible for deletion.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Register a connection as a player and assign it a symbol.
    ///
    /// Re-joining a room the connection is already in returns the existing
    /// symbol unchanged. The joiner receives whichever symbol is currently
    /// free (X first), so symbols stay unique even after departures.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::RoomFull` when two players are already seated.
    pub fn add_player(
        &mut self,
        conn_id: ClientId,
        name: Option<PlayerName>,
    ) -> Result<Symbol, RoomError> {
        if let Some(existing) = self.player(&conn_id) {
            return Ok(existing.symbol);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull {
                capacity: MAX_PLAYERS,
            });
        }

        let symbol = if self.player_with_symbol(Symbol::X).is_none() {
            Symbol::X
        } else {
            Symbol::O
        };
        if self.creator.is_none() {
            self.creator = Some(conn_id.clone());
        }
        self.players.push(Player {
            id: conn_id,
            symbol,
            name,
        });
        Ok(symbol)
    }

    /// Remove a player by connection id.
    ///
    /// When the departing player held the creator privilege it transfers to
    /// the earliest-joined remaining player, or becomes None when the room
    /// empties (the store then deletes the room).
    pub fn remove_player(&mut self, conn_id: &ClientId) {
        self.players.retain(|p| &p.id != conn_id);
        if self.creator.as_ref() == Some(conn_id) {
            self.creator = self.players.first().map(|p| p.id.clone());
        }
    }

    /// Validate and apply a move.
    ///
    /// Validations run in a fixed order (index, player, symbol, turn, cell)
    /// so error precedence stays deterministic; the board is only touched
    /// after every check passes.
    pub fn apply_move(
        &mut self,
        conn_id: &ClientId,
        index: i64,
        symbol: Symbol,
    ) -> Result<(), RoomError> {
        if index < 0 || index as usize >= self.board.len() {
            return Err(RoomError::InvalidIndex {
                index,
                cells: self.board.len(),
            });
        }
        let idx = index as usize;

        let player = self.player(conn_id).ok_or(RoomError::NotAPlayer)?;
        if player.symbol != symbol {
            return Err(RoomError::SymbolMismatch {
                claimed: symbol,
                assigned: player.symbol,
            });
        }

        let to_move = if self.x_turn { Symbol::X } else { Symbol::O };
        if symbol != to_move {
            return Err(RoomError::NotYourTurn(to_move));
        }

        if self.board[idx].is_some() {
            return Err(RoomError::CellOccupied(idx));
        }

        self.board[idx] = Some(symbol);
        self.x_turn = !self.x_turn;
        Ok(())
    }

    /// Clear the board for a new game.
    ///
    /// The starter is the complement of the previous game's starter (X when
    /// no game has been started yet), so openings alternate fairly. Scores
    /// survive the reset.
    pub fn reset(&mut self) {
        let starter = self
            .last_starter
            .map(Symbol::complement)
            .unwrap_or(Symbol::X);
        self.board = board::empty_board(self.size);
        self.x_turn = starter == Symbol::X;
        self.last_starter = Some(starter);
    }

    /// Append a chat message, evicting the oldest entry at capacity.
    pub fn add_message(&mut self, message: ChatMessage) {
        if self.messages.len() >= MESSAGE_CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Symbols currently seated, in join order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.players.iter().map(|p| p.symbol).collect()
    }

    /// Leading cells of the board for monitoring summaries.
    pub fn board_preview(&self) -> Vec<Option<Symbol>> {
        self.board
            .iter()
            .take(BOARD_PREVIEW_CELLS)
            .copied()
            .collect()
    }
}
