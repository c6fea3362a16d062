pub mod event;

use crate::model::id::{CondominiumId, SpaceId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Space {
    pub space_id: SpaceId,
    pub condominium_id: CondominiumId,
    pub space_name: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
