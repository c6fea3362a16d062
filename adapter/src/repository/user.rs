use crate::{
    database::model::user::UserRow,
    kv::{key, KvClient},
};
use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::user::{
        event::{CreateUser, UpdateUserProfile},
        User,
    },
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    kv: KvClient,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_or_register(&self, event: CreateUser) -> AppResult<User> {
        let key = key::user(event.user_id);
        if let Some(row) = self.kv.get::<UserRow>(&key).await? {
            return Ok(row.into());
        }

        let row = UserRow::new(event, chrono::Utc::now());
        self.kv.set(&key, &row).await?;
        tracing::info!(user_id = %row.id, role = ?row.role, "user profile registered");
        Ok(row.into())
    }

    async fn update_profile(&self, event: UpdateUserProfile) -> AppResult<User> {
        let key = key::user(event.user_id);
        let Some(mut row) = self.kv.get::<UserRow>(&key).await? else {
            return Err(AppError::EntityNotFound(format!(
                "user ({}) was not found",
                event.user_id
            )));
        };

        row.nome = event.user_name;
        // 電話番号は指定された場合のみ上書きする
        if event.phone.is_some() {
            row.telefone = event.phone;
        }
        self.kv.set(&key, &row).await?;
        Ok(row.into())
    }
}
