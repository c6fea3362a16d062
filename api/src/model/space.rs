use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{CondominiumId, SpaceId},
    space::{
        event::{CreateSpace, UpdateSpace},
        Space,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    #[garde(length(min = 1))]
    pub nome: String,
    #[garde(range(min = 1))]
    pub capacidade: i32,
}

#[derive(new)]
pub struct CreateSpaceRequestWithCondominium(CondominiumId, CreateSpaceRequest);

impl From<CreateSpaceRequestWithCondominium> for CreateSpace {
    fn from(value: CreateSpaceRequestWithCondominium) -> Self {
        let CreateSpaceRequestWithCondominium(condominium_id, CreateSpaceRequest { nome, capacidade }) = value;
        CreateSpace {
            condominium_id,
            space_name: nome,
            capacity: capacidade,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSpaceRequest {
    #[garde(length(min = 1))]
    pub nome: Option<String>,
    #[garde(range(min = 1))]
    pub capacidade: Option<i32>,
    #[garde(skip)]
    pub ativo: Option<bool>,
}

#[derive(new)]
pub struct UpdateSpaceRequestWithIds(SpaceId, CondominiumId, UpdateSpaceRequest);

impl From<UpdateSpaceRequestWithIds> for UpdateSpace {
    fn from(value: UpdateSpaceRequestWithIds) -> Self {
        let UpdateSpaceRequestWithIds(
            space_id,
            requested_by,
            UpdateSpaceRequest {
                nome,
                capacidade,
                ativo,
            },
        ) = value;
        UpdateSpace {
            space_id,
            space_name: nome,
            capacity: capacidade,
            is_active: ativo,
            requested_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpaceResponse {
    pub id: SpaceId,
    pub id_condominio: CondominiumId,
    pub nome: String,
    pub capacidade: i32,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let Space {
            space_id,
            condominium_id,
            space_name,
            capacity,
            is_active,
            created_at,
            updated_at,
        } = value;
        Self {
            id: space_id,
            id_condominio: condominium_id,
            nome: space_name,
            capacidade: capacity,
            ativo: is_active,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpaceEnvelope {
    pub success: bool,
    pub espaco: SpaceResponse,
}

impl From<Space> for SpaceEnvelope {
    fn from(value: Space) -> Self {
        Self {
            success: true,
            espaco: value.into(),
        }
    }
}
