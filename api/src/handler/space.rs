use crate::{
    extractor::{AuthorizedUser, JsonBody, PathParam},
    model::{
        space::{
            CreateSpaceRequest, CreateSpaceRequestWithCondominium, SpaceEnvelope, SpaceResponse,
            UpdateSpaceRequest, UpdateSpaceRequestWithIds,
        },
        SuccessResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{id::SpaceId, space::event::DeleteSpace};
use registry::AppRegistry;
use shared::error::AppResult;

#[tracing::instrument(skip(user, registry, req), fields(user_id = %user.id()))]
pub async fn register_space(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): JsonBody<CreateSpaceRequest>,
) -> AppResult<(StatusCode, Json<SpaceEnvelope>)> {
    let condominium_id = user.administered_condominium()?;
    req.validate(&())?;

    registry
        .space_repository()
        .create(CreateSpaceRequestWithCondominium::new(condominium_id, req).into())
        .await
        .map(|space| (StatusCode::CREATED, Json(space.into())))
}

pub async fn show_space_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<SpaceResponse>>> {
    // condominium に所属していないユーザーには空の一覧を返す
    let Some(condominium_id) = user.user.condominium_id else {
        return Ok(Json(Vec::new()));
    };

    registry
        .space_repository()
        .find_by_condominium_id(condominium_id)
        .await
        .map(|spaces| spaces.into_iter().map(SpaceResponse::from).collect())
        .map(Json)
}

#[tracing::instrument(skip(user, registry, req), fields(user_id = %user.id()))]
pub async fn update_space(
    user: AuthorizedUser,
    WithRejection(Path(space_id), _): PathParam<SpaceId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): JsonBody<UpdateSpaceRequest>,
) -> AppResult<Json<SpaceEnvelope>> {
    let condominium_id = user.administered_condominium()?;
    req.validate(&())?;

    let update_space = UpdateSpaceRequestWithIds::new(space_id, condominium_id, req);
    registry
        .space_repository()
        .update(update_space.into())
        .await
        .map(SpaceEnvelope::from)
        .map(Json)
}

#[tracing::instrument(skip(user, registry), fields(user_id = %user.id()))]
pub async fn delete_space(
    user: AuthorizedUser,
    WithRejection(Path(space_id), _): PathParam<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SuccessResponse>> {
    let delete_space = DeleteSpace {
        space_id,
        requested_by: user.administered_condominium()?,
    };

    registry
        .space_repository()
        .delete(delete_space)
        .await
        .map(|_| Json(SuccessResponse::ok()))
}
