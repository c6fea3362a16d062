use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ReservationId, SpaceId, UserId},
    reservation::{Reservation, ReservationStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub id_espaco: SpaceId,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
}

// 不正な値は 400 で返すため、文字列のまま受け取る
#[derive(Debug, Deserialize)]
pub struct UpdateReservationStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub id_espaco: SpaceId,
    pub id_usuario: UserId,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub status: ReservationStatus,
    pub espaco_nome: String,
    pub usuario_nome: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            space_id,
            reserved_by,
            span,
            status,
            space_name,
            requester_name,
            created_at,
            updated_at,
            cancelled_at,
        } = value;
        Self {
            id: reservation_id,
            id_espaco: space_id,
            id_usuario: reserved_by,
            data_inicio: span.start(),
            data_fim: span.end(),
            status,
            espaco_nome: space_name,
            usuario_nome: requester_name,
            created_at,
            updated_at,
            cancelled_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationEnvelope {
    pub success: bool,
    pub reserva: ReservationResponse,
}

impl From<Reservation> for ReservationEnvelope {
    fn from(value: Reservation) -> Self {
        Self {
            success: true,
            reserva: value.into(),
        }
    }
}
