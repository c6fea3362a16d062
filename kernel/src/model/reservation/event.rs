use crate::model::{
    id::{ReservationId, SpaceId},
    reservation::{schedule::TimeSpan, ReservationStatus},
    user::User,
};
use derive_new::new;

#[derive(new)]
pub struct CreateReservation {
    pub space_id: SpaceId,
    pub span: TimeSpan,
    pub requested_user: User,
}

#[derive(new)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub requested_user: User,
}

#[derive(new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub requested_user: User,
}
