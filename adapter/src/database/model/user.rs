use chrono::{DateTime, Utc};
use kernel::model::{
    id::{CondominiumId, UserId},
    role::Role,
    user::{event::CreateUser, User},
};
use serde::{Deserialize, Serialize};

// user:{id} に保存されるプロフィール
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRow {
    pub id: UserId,
    pub nome: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_condominio: Option<CondominiumId>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn new(event: CreateUser, created_at: DateTime<Utc>) -> Self {
        let CreateUser {
            user_id,
            user_name,
            email,
            phone,
            role,
            condominium_id,
        } = event;
        Self {
            id: user_id,
            nome: user_name,
            email,
            telefone: phone,
            role,
            id_condominio: condominium_id,
            created_at,
        }
    }
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            id,
            nome,
            email,
            telefone,
            role,
            id_condominio,
            created_at: _,
        } = value;
        User {
            user_id: id,
            user_name: nome,
            email,
            phone: telefone,
            role,
            condominium_id: id_condominio,
        }
    }
}
