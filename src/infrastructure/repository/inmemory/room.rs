//! InMemory RoomStore 実装
//!
//! ドメイン層が定義する RoomStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ルームテーブル全体を 1 つの tokio Mutex で保護しており、各操作は
//! 「ロック取得 → 検証 → 変更」を 1 回のロック区間で行います。
//! これによりマルチスレッドランタイム上でも、元のシングルスレッド
//! イベントループと同じ原子性が保たれます。

use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ClientId, CreateRoomOutcome, PlayerName, Room, RoomError, RoomId, RoomOptions,
    RoomStore, RoomSummary, Symbol,
};

/// インメモリ RoomStore 実装
///
/// プロセス起動時に 1 度だけ構築され、ハンドル経由で各コンポーネントに
/// 渡されます（暗黙のシングルトンへの直接参照はしない）。
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomStore {
    /// 新しい空の InMemoryRoomStore を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(&self, id: RoomId, options: RoomOptions) -> CreateRoomOutcome {
        let mut rooms = self.rooms.lock().await;
        match rooms.entry(id.clone()) {
            Entry::Occupied(entry) => CreateRoomOutcome {
                created: false,
                room: entry.get().clone(),
            },
            Entry::Vacant(entry) => {
                let room = Room::new(id, options);
                entry.insert(room.clone());
                tracing::info!("room '{}' created", room.id);
                CreateRoomOutcome {
                    created: true,
                    room,
                }
            }
        }
    }

    async fn get_room(&self, id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(id).cloned()
    }

    async fn add_player(
        &self,
        id: &RoomId,
        conn_id: ClientId,
        name: Option<PlayerName>,
    ) -> Result<Symbol, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;
        room.add_player(conn_id, name)
    }

    async fn remove_player(&self, id: &RoomId, conn_id: &ClientId) -> Option<Room> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(id)?;
        room.remove_player(conn_id);

        // Empty rooms are deleted immediately
        if room.is_empty() {
            rooms.remove(id);
            tracing::info!("room '{}' removed (empty)", id);
            return None;
        }
        Some(room.clone())
    }

    async fn apply_move(
        &self,
        id: &RoomId,
        conn_id: &ClientId,
        index: i64,
        symbol: Symbol,
    ) -> Result<Room, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;
        room.apply_move(conn_id, index, symbol)?;
        Ok(room.clone())
    }

    async fn increment_score(&self, id: &RoomId, symbol: Symbol) {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get_mut(id) {
            room.scores.increment(symbol);
        }
    }

    async fn reset_room(&self, id: &RoomId) -> Result<Room, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;
        room.reset();
        Ok(room.clone())
    }

    async fn add_message(
        &self,
        id: &RoomId,
        conn_id: &ClientId,
        message: ChatMessage,
    ) -> Result<ChatMessage, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;
        if room.player(conn_id).is_none() {
            return Err(RoomError::NotAPlayer);
        }
        room.add_message(message.clone());
        Ok(message)
    }

    async fn get_messages(&self, id: &RoomId) -> Vec<ChatMessage> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(id)
            .map(|room| room.messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        rooms
            .values()
            .map(|room| RoomSummary {
                id: room.id.clone(),
                size: room.size,
                win_len: room.win_len,
                players: room.symbols(),
                x_turn: room.x_turn,
                board_preview: room.board_preview(),
                scores: room.scores,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_is_idempotent() {
        // テスト項目: 2 回目の create_room は最初のルームを変更せずに返す
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        let first = store
            .create_room(
                room_id("r1"),
                RoomOptions {
                    size: Some(5),
                    win_len: Some(4),
                },
            )
            .await;

        // when (操作): 異なるオプションで再作成
        let second = store
            .create_room(
                room_id("r1"),
                RoomOptions {
                    size: Some(9),
                    win_len: Some(9),
                },
            )
            .await;

        // then (期待する結果): 2 回目のオプションは無視される
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.room.size, 5);
        assert_eq!(second.room.win_len, 4);
    }

    #[tokio::test]
    async fn test_scenario_join_move_turn_rejection() {
        // テスト項目: 参加 → X の着手受理 → 手番外の着手拒否 の一連の流れ
        // given (前提条件): size=3, win_len=3 のルームに 2 人参加
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;

        let a = store.add_player(&id, conn("a"), None).await.unwrap();
        let b = store.add_player(&id, conn("b"), None).await.unwrap();
        assert_eq!(a, Symbol::X);
        assert_eq!(b, Symbol::O);

        // when (操作): A が index 0 に X を置く
        let room = store
            .apply_move(&id, &conn("a"), 0, Symbol::X)
            .await
            .unwrap();

        // then (期待する結果): 受理され手番が O に移る
        assert_eq!(room.board[0], Some(Symbol::X));
        assert!(!room.x_turn);

        // when (操作): A が続けて index 1 に置こうとする
        let result = store.apply_move(&id, &conn("a"), 1, Symbol::X).await;

        // then (期待する結果): NotYourTurn で拒否、盤面は変化しない
        assert_eq!(result, Err(RoomError::NotYourTurn(Symbol::O)));
        let room = store.get_room(&id).await.unwrap();
        assert_eq!(room.board[1], None);
    }

    #[tokio::test]
    async fn test_apply_move_on_missing_room() {
        // テスト項目: 存在しないルームへの着手は RoomNotFound
        // given (前提条件):
        let store = InMemoryRoomStore::new();

        // when (操作):
        let result = store
            .apply_move(&room_id("nope"), &conn("a"), 0, Symbol::X)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomNotFound(room_id("nope"))));
    }

    #[tokio::test]
    async fn test_remove_last_player_deletes_room() {
        // テスト項目: プレイヤーが空になった瞬間にルームが削除される
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;
        store.add_player(&id, conn("a"), None).await.unwrap();

        // when (操作):
        let survivor = store.remove_player(&id, &conn("a")).await;

        // then (期待する結果):
        assert!(survivor.is_none());
        assert!(store.get_room(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_creator_transfers_privilege() {
        // テスト項目: creator 退出後、残存プレイヤーが creator になる
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;
        store.add_player(&id, conn("a"), None).await.unwrap();
        store.add_player(&id, conn("b"), None).await.unwrap();

        // when (操作):
        let survivor = store.remove_player(&id, &conn("a")).await.unwrap();

        // then (期待する結果): b が creator となり reset を実行できる
        assert_eq!(survivor.creator, Some(conn("b")));
        let reset = store.reset_room(&id).await.unwrap();
        assert!(reset.board.iter().all(Option::is_none));
    }

    #[tokio::test]
    async fn test_increment_score_missing_room_is_noop() {
        // テスト項目: 存在しないルームへのスコア加算は何もしない
        // given (前提条件):
        let store = InMemoryRoomStore::new();

        // when (操作): パニックせず完了すれば良い
        store.increment_score(&room_id("nope"), Symbol::X).await;

        // then (期待する結果):
        assert!(store.get_room(&room_id("nope")).await.is_none());
    }

    #[tokio::test]
    async fn test_reset_preserves_scores_and_alternates_starter() {
        // テスト項目: 着手 → リセットで盤面が空に戻り、スコア維持、先手交代
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;
        store.add_player(&id, conn("a"), None).await.unwrap();
        store.add_player(&id, conn("b"), None).await.unwrap();
        store
            .apply_move(&id, &conn("a"), 0, Symbol::X)
            .await
            .unwrap();
        store.increment_score(&id, Symbol::X).await;

        // when (操作):
        let after_first = store.reset_room(&id).await.unwrap();

        // then (期待する結果):
        assert!(after_first.board.iter().all(Option::is_none));
        assert_eq!(after_first.scores.get(Symbol::X), 1);
        assert!(after_first.x_turn);

        // when (操作): もう一度リセット
        let after_second = store.reset_room(&id).await.unwrap();

        // then (期待する結果): 先手が交代している
        assert!(!after_second.x_turn);
        assert_eq!(after_second.scores.get(Symbol::X), 1);
    }

    #[tokio::test]
    async fn test_message_log_roundtrip() {
        // テスト項目: メッセージを追加し履歴を取得できる
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;
        store.add_player(&id, conn("a"), None).await.unwrap();

        // when (操作):
        let msg = ChatMessage::new(
            &conn("a"),
            "alice".to_string(),
            Some("hello".to_string()),
            None,
            Timestamp::new(1),
        );
        store.add_message(&id, &conn("a"), msg.clone()).await.unwrap();

        // then (期待する結果):
        let history = store.get_messages(&id).await;
        assert_eq!(history, vec![msg]);
        // 存在しないルームの履歴は空
        assert!(store.get_messages(&room_id("nope")).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_message_requires_seated_player() {
        // テスト項目: 未参加の接続と退出済みの接続の追記は拒否され、ログは変化しない
        // given (前提条件): a と b が参加したルーム
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;
        store.add_player(&id, conn("a"), None).await.unwrap();
        store.add_player(&id, conn("b"), None).await.unwrap();
        let msg = ChatMessage::new(
            &conn("stranger"),
            "mallory".to_string(),
            Some("hi".to_string()),
            None,
            Timestamp::new(1),
        );

        // when (操作): ルーム外の接続から追記
        let result = store.add_message(&id, &conn("stranger"), msg.clone()).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::NotAPlayer));
        assert!(store.get_messages(&id).await.is_empty());

        // when (操作): b が退出した直後に b 名義で追記
        store.remove_player(&id, &conn("b")).await;
        let result = store.add_message(&id, &conn("b"), msg).await;

        // then (期待する結果): 着席チェックは追記と同一ロック区間で効く
        assert_eq!(result, Err(RoomError::NotAPlayer));
        assert!(store.get_messages(&id).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_rooms_hides_connection_ids() {
        // テスト項目: ルーム一覧は接続 ID を含まないサマリを返す
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        let id = room_id("r1");
        store.create_room(id.clone(), RoomOptions::default()).await;
        store
            .add_player(&id, conn("conn-abc"), None)
            .await
            .unwrap();

        // when (操作):
        let summaries = store.list_rooms().await;

        // then (期待する結果):
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.id, id);
        assert_eq!(summary.players, vec![Symbol::X]);
        let json = serde_json::to_string(summary).unwrap();
        assert!(!json.contains("conn-abc"));
    }
}
