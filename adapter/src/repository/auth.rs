use crate::{
    database::model::auth::{AuthorizationKey, AuthorizedClaims},
    redis::RedisClient,
};
use async_trait::async_trait;
use kernel::{
    model::{
        auth::{AccessToken, IdentityClaims},
        id::UserId,
        role::Role,
    },
    repository::auth::AuthRepository,
};
use reqwest::StatusCode;
use serde::Deserialize;
use shared::{config::IdentityConfig, error::AppResult};
use std::{sync::Arc, time::Duration};

pub struct AuthRepositoryImpl {
    kv: Arc<RedisClient>,
    http: reqwest::Client,
    identity: IdentityConfig,
    ttl: u64,
}

impl AuthRepositoryImpl {
    pub fn new(kv: Arc<RedisClient>, identity: IdentityConfig, ttl: u64) -> Self {
        Self {
            kv,
            http: reqwest::Client::new(),
            identity,
            ttl,
        }
    }

    // 認証基盤の /auth/v1/user にトークンを問い合わせる
    async fn fetch_from_identity_provider(&self, access_token: &AccessToken) -> AppResult<Option<IdentityClaims>> {
        let url = format!("{}/auth/v1/user", self.identity.url.trim_end_matches('/'));
        let res = self
            .http
            .get(url)
            .bearer_auth(&access_token.0)
            .header("apikey", &self.identity.api_key)
            .timeout(Duration::from_secs(self.identity.timeout_secs))
            .send()
            .await?;

        if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::debug!(status = %res.status(), "identity provider rejected the token");
            return Ok(None);
        }

        let user: IdentityUser = res.error_for_status()?.json().await?;
        Ok(Some(user.into()))
    }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_claims_from_token(&self, access_token: &AccessToken) -> AppResult<Option<IdentityClaims>> {
        // 公開キーはユーザーのトークンとして扱わない
        if self.identity.anon_key.as_deref() == Some(access_token.0.as_str()) {
            return Ok(None);
        }

        let key = AuthorizationKey::from(access_token);
        if let Some(cached) = self.kv.get(&key).await? {
            return Ok(Some(cached.into_inner()));
        }

        let Some(claims) = self.fetch_from_identity_provider(access_token).await? else {
            return Ok(None);
        };
        self.kv
            .set_ex(&key, &AuthorizedClaims(claims.clone()), self.ttl)
            .await?;
        Ok(Some(claims))
    }
}

// 認証基盤が返すユーザー
#[derive(Debug, Deserialize)]
struct IdentityUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: IdentityMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct IdentityMetadata {
    nome: Option<String>,
    telefone: Option<String>,
    tipo_usuario: Option<String>,
    id_condominio: Option<String>,
}

impl From<IdentityUser> for IdentityClaims {
    fn from(value: IdentityUser) -> Self {
        let IdentityUser {
            id,
            email,
            user_metadata,
        } = value;
        IdentityClaims {
            user_id: id,
            email: email.unwrap_or_default(),
            user_name: user_metadata.nome.filter(|n| !n.trim().is_empty()),
            phone: user_metadata.telefone,
            role: user_metadata.tipo_usuario.and_then(|r| r.parse::<Role>().ok()),
            condominium_id: user_metadata.id_condominio.and_then(|c| c.parse().ok()),
        }
    }
}
