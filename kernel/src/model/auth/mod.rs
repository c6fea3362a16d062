use crate::model::{
    id::{CondominiumId, UserId},
    role::Role,
};
use serde::{Deserialize, Serialize};

pub struct AccessToken(pub String);

// 認証基盤がトークンに紐づけて返すユーザー情報
// プロフィール未登録のユーザーはここから登録される
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub user_id: UserId,
    pub email: String,
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub condominium_id: Option<CondominiumId>,
}
