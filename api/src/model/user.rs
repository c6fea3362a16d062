use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{CondominiumId, UserId},
    role::Role,
    user::{event::UpdateUserProfile, User},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub role: Role,
    pub id_condominio: Option<CondominiumId>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            user_name,
            email,
            phone,
            role,
            condominium_id,
        } = value;
        Self {
            id: user_id,
            nome: user_name,
            email,
            telefone: phone,
            role,
            id_condominio: condominium_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedUserResponse {
    pub success: bool,
    pub user: UserResponse,
}

impl From<User> for UpdatedUserResponse {
    fn from(value: User) -> Self {
        Self {
            success: true,
            user: value.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserProfileRequest {
    #[garde(custom(not_blank))]
    nome: String,
    #[garde(skip)]
    telefone: Option<String>,
}

fn not_blank(value: &str, _: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}

#[derive(new)]
pub struct UpdateUserProfileRequestWithUserId(UserId, UpdateUserProfileRequest);

impl From<UpdateUserProfileRequestWithUserId> for UpdateUserProfile {
    fn from(value: UpdateUserProfileRequestWithUserId) -> Self {
        let UpdateUserProfileRequestWithUserId(user_id, UpdateUserProfileRequest { nome, telefone }) = value;
        Self {
            user_id,
            user_name: nome.trim().to_string(),
            phone: telefone.filter(|t| !t.trim().is_empty()),
        }
    }
}
