//! UseCase 層
//!
//! ルームサービスを構成するレイヤー。UI 層（ゲートウェイ・HTTP）から
//! 呼び出され、RoomStore の操作と勝敗判定を組み合わせて、クライアントに
//! 渡して安全なビューを返します。

pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod play_move;
pub mod reset_room;
pub mod send_chat;

pub use error::SendChatError;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use play_move::{MoveOutcome, PlayMoveUseCase};
pub use reset_room::ResetRoomUseCase;
pub use send_chat::SendChatUseCase;
