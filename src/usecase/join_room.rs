//! UseCase: ルーム参加処理
//!
//! ルームの get-or-create、プレイヤー登録、参加直後にクライアントへ
//! 返すスナップショット（盤面とチャット履歴）の組み立てを行います。

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ClientId, PlayerName, Room, RoomError, RoomId, RoomOptions, RoomStore, Symbol,
};

/// ルーム参加の結果
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// このルームが今回の参加で新規作成されたか
    pub created: bool,
    /// 割り当てられたシンボル
    pub symbol: Symbol,
    /// 参加後のルームスナップショット
    pub room: Room,
    /// 既存のチャット履歴（古い順）
    pub history: Vec<ChatMessage>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
}

impl JoinRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// ルームに参加する
    ///
    /// ルームが存在しない場合は options 付きで作成します（既存ルームの
    /// options は変更されない）。満室の場合は `RoomError::RoomFull`。
    pub async fn execute(
        &self,
        room_id: RoomId,
        conn_id: ClientId,
        name: Option<PlayerName>,
        options: RoomOptions,
    ) -> Result<JoinOutcome, RoomError> {
        let outcome = self.store.create_room(room_id.clone(), options).await;
        let symbol = self.store.add_player(&room_id, conn_id, name).await?;

        let room = self
            .store
            .get_room(&room_id)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
        let history = self.store.get_messages(&room_id).await;

        Ok(JoinOutcome {
            created: outcome.created,
            symbol,
            room,
            history,
        })
    }
}
