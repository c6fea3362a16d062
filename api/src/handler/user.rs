use crate::{
    extractor::{AuthorizedUser, JsonBody},
    model::user::{
        UpdateUserProfileRequest, UpdateUserProfileRequestWithUserId, UpdatedUserResponse,
        UserResponse,
    },
};
use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

#[tracing::instrument(skip(user, registry, req), fields(user_id = %user.id()))]
pub async fn update_user_profile(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): JsonBody<UpdateUserProfileRequest>,
) -> AppResult<Json<UpdatedUserResponse>> {
    req.validate(&())?;

    let update_profile = UpdateUserProfileRequestWithUserId::new(user.id(), req);
    registry
        .user_repository()
        .update_profile(update_profile.into())
        .await
        .map(UpdatedUserResponse::from)
        .map(Json)
}
