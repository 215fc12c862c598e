//! UseCase 層のエラー定義
//!
//! ほとんどのユースケースはドメインの RoomError をそのまま返します。
//! チャット送信だけは入力形状の検証が 1 つ増えるため専用の enum を
//! 持ちます。

use thiserror::Error;

use crate::domain::RoomError;

/// チャット送信の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendChatError {
    /// 本文もメディア URL も無いメッセージ
    #[error("Message must contain text or a media url")]
    EmptyMessage,

    /// ルーム操作の検証エラー
    #[error(transparent)]
    Room(#[from] RoomError),
}
