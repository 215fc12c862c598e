//! WebSocket event DTOs.
//!
//! Events carry a `type` tag and camelCase fields: clients send
//! `join` / `move` / `reset` / `chat-message` / `leave`, the server answers
//! with room-scoped broadcasts plus requester-only acknowledgments and
//! errors.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, LineCell, Player, Room, Scores, Symbol, Verdict};

/// Events sent from client to server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    Join {
        room: Option<String>,
        size: Option<usize>,
        win_len: Option<usize>,
        name: Option<String>,
    },
    Move {
        room: Option<String>,
        index: i64,
        symbol: Symbol,
    },
    Reset {
        room: Option<String>,
    },
    ChatMessage {
        sender: Option<String>,
        text: Option<String>,
        media_url: Option<String>,
    },
    Leave {
        room: Option<String>,
    },
}

/// Events sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Join confirmation for the requester
    Joined {
        room: String,
        symbol: Symbol,
        board: Vec<Option<Symbol>>,
        x_turn: bool,
        size: usize,
        win_len: usize,
        players: Vec<PlayerDto>,
        scores: Scores,
        creator_id: Option<String>,
    },
    /// Recent chat log, sent to the requester right after `joined`
    ChatHistory { messages: Vec<ChatMessageDto> },
    /// Another player entered the room
    PlayerJoined {
        id: String,
        symbol: Symbol,
        name: Option<String>,
    },
    /// Roster/score snapshot for the whole room
    PlayersUpdated {
        players: Vec<PlayerDto>,
        scores: Scores,
        creator_id: Option<String>,
    },
    /// Board state after an accepted move or a reset
    BoardUpdate {
        board: Vec<Option<Symbol>>,
        x_turn: bool,
    },
    /// A winning line was completed or the board filled up
    GameEnded {
        winner: WinnerDto,
        line: Option<Vec<LineCell>>,
        scores: Scores,
        players: Vec<PlayerDto>,
    },
    /// A player left the room
    PlayerLeft { id: String },
    /// Chat message broadcast to everyone except the sender
    ChatMessage(ChatMessageDto),
    /// Requester-only confirmation of the sender's own chat message
    ChatMessageAck(ChatMessageDto),
    /// Requester-only join failure
    JoinError { message: String },
    /// Requester-only failure for any other event
    Error { message: String },
}

/// Sanitized player entry: the connection id is part of the contract so
/// clients can recognize their own seat.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub id: String,
    pub symbol: Symbol,
    pub name: Option<String>,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            symbol: player.symbol,
            name: player.name.as_ref().map(|n| n.to_string()),
        }
    }
}

/// Game outcome on the wire: `"X"`, `"O"` or `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WinnerDto {
    #[serde(rename = "X")]
    X,
    #[serde(rename = "O")]
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Symbol> for WinnerDto {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => WinnerDto::X,
            Symbol::O => WinnerDto::O,
        }
    }
}

/// Chat message as delivered to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub sender: String,
    pub text: Option<String>,
    pub media_url: Option<String>,
    pub created_at: i64,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            sender: message.sender.clone(),
            text: message.text.clone(),
            media_url: message.media_url.clone(),
            created_at: message.created_at.value(),
        }
    }
}

impl ServerEvent {
    /// Join confirmation built from a room snapshot.
    pub fn joined(room: &Room, symbol: Symbol) -> Self {
        ServerEvent::Joined {
            room: room.id.to_string(),
            symbol,
            board: room.board.clone(),
            x_turn: room.x_turn,
            size: room.size,
            win_len: room.win_len,
            players: room.players.iter().map(PlayerDto::from).collect(),
            scores: room.scores,
            creator_id: room.creator.as_ref().map(|c| c.to_string()),
        }
    }

    /// Roster/score broadcast built from a room snapshot.
    pub fn players_updated(room: &Room) -> Self {
        ServerEvent::PlayersUpdated {
            players: room.players.iter().map(PlayerDto::from).collect(),
            scores: room.scores,
            creator_id: room.creator.as_ref().map(|c| c.to_string()),
        }
    }

    /// Board broadcast built from a room snapshot.
    pub fn board_update(room: &Room) -> Self {
        ServerEvent::BoardUpdate {
            board: room.board.clone(),
            x_turn: room.x_turn,
        }
    }

    /// Game-end broadcast for a decided verdict. Returns None while the
    /// game is still ongoing.
    pub fn game_ended(room: &Room, verdict: &Verdict) -> Option<Self> {
        let (winner, line) = match verdict {
            Verdict::Won { symbol, line } => ((*symbol).into(), Some(line.clone())),
            Verdict::Draw => (WinnerDto::Draw, None),
            Verdict::Ongoing => return None,
        };
        Some(ServerEvent::GameEnded {
            winner,
            line,
            scores: room.scores,
            players: room.players.iter().map(PlayerDto::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_join_parses_camel_case() {
        // テスト項目: join イベントの winLen フィールドを受理できる
        // given (前提条件):
        let json = r#"{"type":"join","room":"r1","size":5,"winLen":4,"name":"alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::Join {
                room,
                size,
                win_len,
                name,
            } => {
                assert_eq!(room.as_deref(), Some("r1"));
                assert_eq!(size, Some(5));
                assert_eq!(win_len, Some(4));
                assert_eq!(name.as_deref(), Some("alice"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_client_event_chat_message_tag() {
        // テスト項目: chat-message イベントの mediaUrl を受理できる
        // given (前提条件):
        let json = r#"{"type":"chat-message","sender":"alice","mediaUrl":"https://cdn/x.png"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::ChatMessage {
                sender,
                text,
                media_url,
            } => {
                assert_eq!(sender.as_deref(), Some("alice"));
                assert_eq!(text, None);
                assert_eq!(media_url.as_deref(), Some("https://cdn/x.png"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_server_event_board_update_wire_shape() {
        // テスト項目: board-update は type タグと xTurn を持つ
        // given (前提条件):
        let event = ServerEvent::BoardUpdate {
            board: vec![Some(Symbol::X), None],
            x_turn: false,
        };

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "board-update");
        assert_eq!(json["xTurn"], false);
        assert_eq!(json["board"][0], "X");
        assert!(json["board"][1].is_null());
    }

    #[test]
    fn test_server_event_game_ended_draw_wire_shape() {
        // テスト項目: 引き分けは winner "draw"、line null で送られる
        // given (前提条件):
        let event = ServerEvent::GameEnded {
            winner: WinnerDto::Draw,
            line: None,
            scores: Scores::default(),
            players: vec![],
        };

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "game-ended");
        assert_eq!(json["winner"], "draw");
        assert!(json["line"].is_null());
        assert_eq!(json["scores"]["X"], 0);
    }
}
