use kernel::model::id::{ReservationId, SpaceId, UserId};

// 予約はスペースごとにキーをまとめ、重複チェックでは対象スペースのみを走査する
pub const SPACE_PREFIX: &str = "espaco:";
pub const RESERVATION_PREFIX: &str = "reserva:";
pub const RESERVATION_SPACE_PREFIX: &str = "reserva-espaco:";

pub fn user(user_id: UserId) -> String {
    format!("user:{user_id}")
}

pub fn space(space_id: SpaceId) -> String {
    format!("{SPACE_PREFIX}{space_id}")
}

pub fn reservations_of_space(space_id: SpaceId) -> String {
    format!("{RESERVATION_PREFIX}{space_id}:")
}

pub fn reservation(space_id: SpaceId, reservation_id: ReservationId) -> String {
    format!("{RESERVATION_PREFIX}{space_id}:{reservation_id}")
}

// 予約 ID からスペース ID を引くためのキー
pub fn reservation_space(reservation_id: ReservationId) -> String {
    format!("{RESERVATION_SPACE_PREFIX}{reservation_id}")
}
