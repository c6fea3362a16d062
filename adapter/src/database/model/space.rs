use chrono::{DateTime, Utc};
use kernel::model::{
    id::{CondominiumId, SpaceId},
    space::Space,
};
use serde::{Deserialize, Serialize};

// espaco:{id} に保存されるスペース
#[derive(Debug, Serialize, Deserialize)]
pub struct SpaceRow {
    pub id: SpaceId,
    pub id_condominio: CondominiumId,
    pub nome: String,
    pub capacidade: i32,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<SpaceRow> for Space {
    fn from(value: SpaceRow) -> Self {
        let SpaceRow {
            id,
            id_condominio,
            nome,
            capacidade,
            ativo,
            created_at,
            updated_at,
            deleted_at: _,
        } = value;
        Space {
            space_id: id,
            condominium_id: id_condominio,
            space_name: nome,
            capacity: capacidade,
            is_active: ativo,
            created_at,
            updated_at,
        }
    }
}
