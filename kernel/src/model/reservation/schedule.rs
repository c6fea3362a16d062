use crate::model::{id::SpaceId, reservation::Reservation};
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

// 予約時間帯は半開区間 [start, end) として扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidInput(format!(
                "reservation must end after it starts ({start} >= {end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    // 終了時刻と開始時刻がちょうど接する場合は重複しない
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// 同じスペースのキャンセルされていない予約のうち、span と重なる最初の予約を返す
pub fn find_conflict<'a, I>(space_id: SpaceId, span: &TimeSpan, existing: I) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    existing
        .into_iter()
        .filter(|r| r.space_id == space_id && r.status.is_blocking())
        .find(|r| r.span.overlaps(span))
}

pub fn check_conflict<'a, I>(space_id: SpaceId, span: &TimeSpan, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Reservation>,
{
    find_conflict(space_id, span, existing).is_some()
}
