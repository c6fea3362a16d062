use crate::model::id::{CondominiumId, SpaceId};

pub struct CreateSpace {
    pub condominium_id: CondominiumId,
    pub space_name: String,
    pub capacity: i32,
}

// requested_by は操作する síndico の condominium
#[derive(Debug)]
pub struct UpdateSpace {
    pub space_id: SpaceId,
    pub space_name: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
    pub requested_by: CondominiumId,
}

#[derive(Debug)]
pub struct DeleteSpace {
    pub space_id: SpaceId,
    pub requested_by: CondominiumId,
}
