use crate::model::id::{ReservationId, SpaceId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString};

pub mod event;
pub mod schedule;

use schedule::TimeSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[strum(to_string = "pendente", serialize = "pending")]
    #[serde(rename = "pendente", alias = "pending")]
    Pending,
    #[strum(to_string = "confirmada", serialize = "confirmed")]
    #[serde(rename = "confirmada", alias = "confirmed")]
    Confirmed,
    #[strum(to_string = "cancelada", serialize = "cancelled")]
    #[serde(rename = "cancelada", alias = "cancelled")]
    Cancelled,
}

impl ReservationStatus {
    // キャンセル済みの予約は重複チェックの対象外
    pub fn is_blocking(self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }
}

// space_name と requester_name は作成時点の値を複製したもので、後から同期されない
#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub space_id: SpaceId,
    pub reserved_by: UserId,
    pub span: TimeSpan,
    pub status: ReservationStatus,
    pub space_name: String,
    pub requester_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    // 承認フローでの状態遷移
    pub fn transition_to(&mut self, next: ReservationStatus, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidState(format!(
                "reservation {} cannot change from {} to {}",
                self.reservation_id, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Some(now);
        if next == ReservationStatus::Cancelled {
            self.cancelled_at = Some(now);
        }
        Ok(())
    }

    // 直接のキャンセルは現在の状態に関係なく成功する
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        if self.status == ReservationStatus::Cancelled {
            return;
        }
        self.status = ReservationStatus::Cancelled;
        self.updated_at = Some(now);
        self.cancelled_at = Some(now);
    }
}
