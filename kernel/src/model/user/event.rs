use crate::model::{
    auth::IdentityClaims,
    id::{CondominiumId, UserId},
    role::Role,
};

pub struct CreateUser {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub condominium_id: Option<CondominiumId>,
}

impl From<IdentityClaims> for CreateUser {
    fn from(value: IdentityClaims) -> Self {
        let IdentityClaims {
            user_id,
            email,
            user_name,
            phone,
            role,
            condominium_id,
        } = value;
        let role = role.unwrap_or(Role::Resident);
        // condominium 未指定の síndico には新しい condominium を割り当てる
        let condominium_id = match (role, condominium_id) {
            (Role::Administrator, None) => Some(CondominiumId::new()),
            (_, id) => id,
        };
        Self {
            user_name: user_name.unwrap_or_else(|| email.clone()),
            user_id,
            email,
            phone,
            role,
            condominium_id,
        }
    }
}

#[derive(Debug)]
pub struct UpdateUserProfile {
    pub user_id: UserId,
    pub user_name: String,
    pub phone: Option<String>,
}
