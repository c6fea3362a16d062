use crate::model::auth::{AccessToken, IdentityClaims};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    // トークンを検証し、紐づくユーザー情報を返す。無効なトークンなら None
    async fn fetch_claims_from_token(&self, access_token: &AccessToken) -> AppResult<Option<IdentityClaims>>;
}
