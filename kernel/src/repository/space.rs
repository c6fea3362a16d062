use crate::model::{
    id::{CondominiumId, SpaceId},
    space::{
        event::{CreateSpace, DeleteSpace, UpdateSpace},
        Space,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    async fn create(&self, event: CreateSpace) -> AppResult<Space>;
    // 利用可能（is_active = true）なスペースのみ返す
    async fn find_by_condominium_id(&self, condominium_id: CondominiumId) -> AppResult<Vec<Space>>;
    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>>;
    async fn update(&self, event: UpdateSpace) -> AppResult<Space>;
    async fn delete(&self, event: DeleteSpace) -> AppResult<()>;
}
