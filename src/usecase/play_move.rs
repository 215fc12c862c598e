//! UseCase: 着手処理
//!
//! RoomStore の着手検証・適用の後に勝敗判定を 1 回だけ実行し、
//! 勝者が出た場合はそのシンボルのスコアを加算します。

use std::sync::Arc;

use crate::domain::{evaluate, ClientId, Room, RoomError, RoomId, RoomStore, Symbol, Verdict};

/// 受理された着手の結果
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// 着手（および必要ならスコア加算）後のルームスナップショット
    pub room: Room,
    /// この着手に対する勝敗判定
    pub verdict: Verdict,
}

/// 着手のユースケース
pub struct PlayMoveUseCase {
    store: Arc<dyn RoomStore>,
}

impl PlayMoveUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// 着手を適用する
    ///
    /// 勝敗判定は受理された着手ごとに 1 回だけ評価されるため、スコア
    /// 加算も勝ちにつき最大 1 回です。検証エラー時は状態を変更しません。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        conn_id: &ClientId,
        index: i64,
        symbol: Symbol,
    ) -> Result<MoveOutcome, RoomError> {
        let room = self
            .store
            .apply_move(room_id, conn_id, index, symbol)
            .await?;

        let verdict = evaluate(&room.board, room.size, room.win_len);

        let room = match &verdict {
            Verdict::Won { symbol: winner, .. } => {
                self.store.increment_score(room_id, *winner).await;
                self.store.get_room(room_id).await.unwrap_or(room)
            }
            Verdict::Draw | Verdict::Ongoing => room,
        };

        Ok(MoveOutcome { room, verdict })
    }
}
