//! UseCase: チャット送信処理
//!
//! メッセージ形状の検証、送信者表示名の解決、ルームの上限付きログへの
//! 追記を行います。追記済みのメッセージ（id とタイムスタンプ採番済み）を
//! 返すので、UI 層はそれをそのまま配信と ACK に使えます。

use std::sync::Arc;

use crate::common::time::unix_timestamp_ms;
use crate::domain::{ChatMessage, ClientId, RoomError, RoomId, RoomStore, Timestamp};
use crate::usecase::error::SendChatError;

fn is_blank(value: &Option<String>) -> bool {
    match value {
        Some(v) => v.trim().is_empty(),
        None => true,
    }
}

/// チャット送信のユースケース
pub struct SendChatUseCase {
    store: Arc<dyn RoomStore>,
}

impl SendChatUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// メッセージをルームのログに追記する
    ///
    /// 本文とメディア URL の両方が空なら `SendChatError::EmptyMessage`。
    /// 送信者がルームのプレイヤーでなければ `RoomError::NotAPlayer`。
    /// sender 未指定時はプレイヤー名、それも無ければシンボル表記で
    /// 補完します。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        conn_id: &ClientId,
        sender: Option<String>,
        text: Option<String>,
        media_url: Option<String>,
    ) -> Result<ChatMessage, SendChatError> {
        if is_blank(&text) && is_blank(&media_url) {
            return Err(SendChatError::EmptyMessage);
        }

        let room = self
            .store
            .get_room(room_id)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
        let player = room.player(conn_id).ok_or(RoomError::NotAPlayer)?;

        let sender = sender
            .filter(|s| !s.trim().is_empty())
            .or_else(|| player.name.as_ref().map(|n| n.to_string()))
            .unwrap_or_else(|| player.symbol.as_str().to_string());

        let message = ChatMessage::new(
            conn_id,
            sender,
            text.filter(|t| !t.trim().is_empty()),
            media_url.filter(|u| !u.trim().is_empty()),
            Timestamp::new(unix_timestamp_ms()),
        );

        Ok(self.store.add_message(room_id, conn_id, message).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerName, RoomOptions};
    use crate::infrastructure::repository::InMemoryRoomStore;

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    async fn seeded_store() -> Arc<InMemoryRoomStore> {
        let store = Arc::new(InMemoryRoomStore::new());
        store
            .create_room(room_id("r1"), RoomOptions::default())
            .await;
        store
            .add_player(
                &room_id("r1"),
                conn("a"),
                Some(PlayerName::new("alice".to_string()).unwrap()),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_text_message_is_appended() {
        // テスト項目: 本文ありのメッセージがログに追記され id が採番される
        // given (前提条件):
        let store = seeded_store().await;
        let usecase = SendChatUseCase::new(store.clone());

        // when (操作):
        let message = usecase
            .execute(
                &room_id("r1"),
                &conn("a"),
                Some("alice".to_string()),
                Some("hello".to_string()),
                None,
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(message.id.starts_with("a-"));
        assert_eq!(message.sender, "alice");
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert_eq!(store.get_messages(&room_id("r1")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_media_only_message_is_valid() {
        // テスト項目: メディア URL だけのメッセージも受理される
        // given (前提条件):
        let store = seeded_store().await;
        let usecase = SendChatUseCase::new(store.clone());

        // when (操作):
        let message = usecase
            .execute(
                &room_id("r1"),
                &conn("a"),
                None,
                None,
                Some("https://example.com/cat.png".to_string()),
            )
            .await
            .unwrap();

        // then (期待する結果): sender はプレイヤー名で補完される
        assert_eq!(message.sender, "alice");
        assert!(message.text.is_none());
        assert_eq!(
            message.media_url.as_deref(),
            Some("https://example.com/cat.png")
        );
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_append() {
        // テスト項目: 本文もメディアも無いメッセージは拒否され、ログは変わらない
        // given (前提条件):
        let store = seeded_store().await;
        let usecase = SendChatUseCase::new(store.clone());

        // when (操作): 空白のみの本文
        let result = usecase
            .execute(
                &room_id("r1"),
                &conn("a"),
                None,
                Some("   ".to_string()),
                None,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), SendChatError::EmptyMessage);
        assert!(store.get_messages(&room_id("r1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_non_player_rejected() {
        // テスト項目: ルーム外の接続からの送信は NotAPlayer で拒否される
        // given (前提条件):
        let store = seeded_store().await;
        let usecase = SendChatUseCase::new(store.clone());

        // when (操作):
        let result = usecase
            .execute(
                &room_id("r1"),
                &conn("stranger"),
                None,
                Some("hi".to_string()),
                None,
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            SendChatError::Room(RoomError::NotAPlayer)
        );
        assert!(store.get_messages(&room_id("r1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_sender_falls_back_to_symbol() {
        // テスト項目: 名前未設定のプレイヤーはシンボル表記で補完される
        // given (前提条件): 名前なしで参加した 2 人目
        let store = seeded_store().await;
        store
            .add_player(&room_id("r1"), conn("b"), None)
            .await
            .unwrap();
        let usecase = SendChatUseCase::new(store.clone());

        // when (操作):
        let message = usecase
            .execute(&room_id("r1"), &conn("b"), None, Some("yo".to_string()), None)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message.sender, "O");
    }
}
