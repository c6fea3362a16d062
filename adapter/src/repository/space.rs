use crate::{
    database::model::space::SpaceRow,
    kv::{key, KvClient},
};
use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::{
    model::{
        id::{CondominiumId, SpaceId},
        space::{
            event::{CreateSpace, DeleteSpace, UpdateSpace},
            Space,
        },
    },
    repository::space::SpaceRepository,
};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct SpaceRepositoryImpl {
    kv: KvClient,
}

#[async_trait]
impl SpaceRepository for SpaceRepositoryImpl {
    async fn create(&self, event: CreateSpace) -> AppResult<Space> {
        let row = SpaceRow {
            id: SpaceId::new(),
            id_condominio: event.condominium_id,
            nome: event.space_name,
            capacidade: event.capacity,
            ativo: true,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        self.kv.set(&key::space(row.id), &row).await?;
        tracing::info!(space_id = %row.id, condominium_id = %row.id_condominio, "space created");
        Ok(row.into())
    }

    async fn find_by_condominium_id(&self, condominium_id: CondominiumId) -> AppResult<Vec<Space>> {
        let rows: Vec<SpaceRow> = self.kv.get_by_prefix(key::SPACE_PREFIX).await?;
        let mut spaces: Vec<Space> = rows
            .into_iter()
            .filter(|s| s.id_condominio == condominium_id && s.ativo)
            .map(Space::from)
            .collect();
        spaces.sort_by(|a, b| a.space_name.cmp(&b.space_name));
        Ok(spaces)
    }

    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>> {
        let row: Option<SpaceRow> = self.kv.get(&key::space(space_id)).await?;
        Ok(row.map(Space::from))
    }

    async fn update(&self, event: UpdateSpace) -> AppResult<Space> {
        let mut row = self.find_owned_row(event.space_id, event.requested_by).await?;

        if let Some(space_name) = event.space_name {
            row.nome = space_name;
        }
        if let Some(capacity) = event.capacity {
            row.capacidade = capacity;
        }
        if let Some(is_active) = event.is_active {
            row.ativo = is_active;
            // 再有効化したスペースは削除済みではなくなる
            if is_active {
                row.deleted_at = None;
            }
        }
        row.updated_at = Some(Utc::now());

        self.kv.set(&key::space(row.id), &row).await?;
        Ok(row.into())
    }

    // 論理削除（ativo = false）とする
    async fn delete(&self, event: DeleteSpace) -> AppResult<()> {
        let mut row = self.find_owned_row(event.space_id, event.requested_by).await?;
        let now = Utc::now();
        row.ativo = false;
        row.deleted_at = Some(now);
        row.updated_at = Some(now);
        self.kv.set(&key::space(row.id), &row).await?;
        tracing::info!(space_id = %row.id, "space deactivated");
        Ok(())
    }
}

impl SpaceRepositoryImpl {
    // 更新・削除の前に、スペースが存在し操作者の condominium のものであるかを確認する
    async fn find_owned_row(&self, space_id: SpaceId, requested_by: CondominiumId) -> AppResult<SpaceRow> {
        let Some(row) = self.kv.get::<SpaceRow>(&key::space(space_id)).await? else {
            return Err(AppError::EntityNotFound(format!(
                "space ({space_id}) was not found"
            )));
        };
        if row.id_condominio != requested_by {
            return Err(AppError::ForbiddenOperation(format!(
                "space ({space_id}) belongs to another condominium"
            )));
        }
        Ok(row)
    }
}
