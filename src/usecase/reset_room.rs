//! UseCase: 盤面リセット処理
//!
//! WebSocket 経由のリセットは creator 権限を要求します。HTTP の管理用
//! エンドポイント向けには権限チェックを行わない admin 版も提供します。

use std::sync::Arc;

use crate::domain::{ClientId, Room, RoomError, RoomId, RoomStore};

/// 盤面リセットのユースケース
pub struct ResetRoomUseCase {
    store: Arc<dyn RoomStore>,
}

impl ResetRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// creator 権限を検証した上で盤面をリセットする
    ///
    /// # Errors
    ///
    /// リクエスト元が creator でない場合は `RoomError::NotCreator`。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        requester: &ClientId,
    ) -> Result<Room, RoomError> {
        let room = self
            .store
            .get_room(room_id)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
        if room.creator.as_ref() != Some(requester) {
            return Err(RoomError::NotCreator);
        }
        self.store.reset_room(room_id).await
    }

    /// 権限チェック無しのリセット（HTTP 管理エンドポイント用）
    pub async fn execute_admin(&self, room_id: &RoomId) -> Result<Room, RoomError> {
        self.store.reset_room(room_id).await
    }
}
