use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ReservationId, SpaceId, UserId},
    reservation::{schedule::TimeSpan, Reservation, ReservationStatus},
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

// reserva:{id_espaco}:{id} に保存される予約
#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationRow {
    pub id: ReservationId,
    pub id_espaco: SpaceId,
    pub id_usuario: UserId,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub status: ReservationStatus,
    pub espaco_nome: String,
    pub usuario_nome: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            id,
            id_espaco,
            id_usuario,
            data_inicio,
            data_fim,
            status,
            espaco_nome,
            usuario_nome,
            created_at,
            updated_at,
            cancelled_at,
        } = value;
        let span = TimeSpan::new(data_inicio, data_fim)
            .map_err(|e| AppError::ConversionEntityError(format!("reservation {id}: {e}")))?;
        Ok(Reservation {
            reservation_id: id,
            space_id: id_espaco,
            reserved_by: id_usuario,
            span,
            status,
            space_name: espaco_nome,
            requester_name: usuario_nome,
            created_at,
            updated_at,
            cancelled_at,
        })
    }
}

impl From<&Reservation> for ReservationRow {
    fn from(value: &Reservation) -> Self {
        Self {
            id: value.reservation_id,
            id_espaco: value.space_id,
            id_usuario: value.reserved_by,
            data_inicio: value.span.start(),
            data_fim: value.span.end(),
            status: value.status,
            espaco_nome: value.space_name.clone(),
            usuario_nome: value.requester_name.clone(),
            created_at: value.created_at,
            updated_at: value.updated_at,
            cancelled_at: value.cancelled_at,
        }
    }
}
