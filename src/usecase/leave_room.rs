//! UseCase: ルーム退出処理
//!
//! プレイヤーの削除、creator 権限の移譲、空になったルームの破棄を
//! RoomStore に委譲します。戻り値が None の場合はルームが破棄された
//! ことを意味し、UI 層は残存者への通知をスキップします。

use std::sync::Arc;

use crate::domain::{ClientId, Room, RoomId, RoomStore};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    store: Arc<dyn RoomStore>,
}

impl LeaveRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// ルームから退出する
    ///
    /// 退出後もルームが残っている場合はそのスナップショットを返します。
    /// 最後のプレイヤーが退出した場合（またはルームが存在しない場合）は
    /// None を返します。
    pub async fn execute(&self, room_id: &RoomId, conn_id: &ClientId) -> Option<Room> {
        self.store.remove_player(room_id, conn_id).await
    }
}
