use crate::model::{
    id::{CondominiumId, ReservationId, UserId},
    reservation::{
        event::{CancelReservation, CreateReservation, UpdateReservationStatus},
        Reservation,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 重複チェックを行ったうえで pendente の予約を作成する
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // síndico による承認・却下
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation>;
    // 予約者本人または síndico によるキャンセル
    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // ユーザー ID に紐づく予約一覧を取得する
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    // condominium のスペースに対する予約一覧を取得する
    async fn find_by_condominium_id(&self, condominium_id: CondominiumId) -> AppResult<Vec<Reservation>>;
}
