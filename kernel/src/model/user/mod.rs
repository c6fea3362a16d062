use crate::model::{
    id::{CondominiumId, UserId},
    role::Role,
};
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub condominium_id: Option<CondominiumId>,
}

impl User {
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    // 指定の condominium の síndico であるか
    pub fn administers(&self, condominium_id: CondominiumId) -> bool {
        self.is_administrator() && self.condominium_id == Some(condominium_id)
    }
}
