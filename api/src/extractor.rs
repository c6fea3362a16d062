use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    Json, RequestPartsExt,
};
use axum_extra::{
    extract::WithRejection,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kernel::model::{
    auth::AccessToken,
    id::{CondominiumId, UserId},
    user::User,
};
use registry::AppRegistry;
use shared::error::AppError;

// 取り出しに失敗した場合も AppError の形式で応答する
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;
pub type PathParam<T> = WithRejection<Path<T>, AppError>;

pub struct AuthorizedUser {
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }

    pub fn is_administrator(&self) -> bool {
        self.user.is_administrator()
    }

    // síndico が管理する condominium を返す。síndico でなければ 403
    pub fn administered_condominium(&self) -> Result<CondominiumId, AppError> {
        match (self.is_administrator(), self.user.condominium_id) {
            (true, Some(condominium_id)) => Ok(condominium_id),
            _ => Err(AppError::ForbiddenOperation(
                "only administrators can perform this operation".into(),
            )),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, registry: &AppRegistry) -> Result<Self, Self::Rejection> {
        // Authorization ヘッダから Bearer トークンを取り出す
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::UnauthorizedError)?;
        let access_token = AccessToken(bearer.token().to_string());

        // 認証基盤でトークンを検証し、ユーザー ID などを取得する
        let claims = registry
            .auth_repository()
            .fetch_claims_from_token(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        // プロフィールを取得する。初回アクセス時はここで登録される
        let user = registry
            .user_repository()
            .find_or_register(claims.into())
            .await?;

        Ok(Self { user })
    }
}
