use crate::model::user::{
    event::{CreateUser, UpdateUserProfile},
    User,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    // プロフィールが未登録であれば event の内容で登録する
    async fn find_or_register(&self, event: CreateUser) -> AppResult<User>;
    async fn update_profile(&self, event: UpdateUserProfile) -> AppResult<User>;
}
