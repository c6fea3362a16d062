#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use adapter::kv::KvClient;
use api::route::v1;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use kernel::{
    model::{
        auth::{AccessToken, IdentityClaims},
        id::{CondominiumId, UserId},
        role::Role,
    },
    repository::auth::AuthRepository,
};
use registry::AppRegistry;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::AppResult;
use tower::ServiceExt;

// トークン文字列とクレームの対応表で認証基盤を置き換える
#[derive(Default)]
pub struct StubAuth {
    tokens: HashMap<String, IdentityClaims>,
}

#[async_trait]
impl AuthRepository for StubAuth {
    async fn fetch_claims_from_token(&self, access_token: &AccessToken) -> AppResult<Option<IdentityClaims>> {
        Ok(self.tokens.get(&access_token.0).cloned())
    }
}

pub const ADMIN: &str = "admin-token";
pub const RESIDENT: &str = "resident-token";
pub const NEIGHBOUR: &str = "neighbour-token";
pub const FOREIGN_ADMIN: &str = "foreign-admin-token";

pub struct TestApp {
    pub router: Router,
    pub condominium_id: CondominiumId,
}

fn claims(name: &str, role: Role, condominium_id: CondominiumId) -> IdentityClaims {
    IdentityClaims {
        user_id: UserId::new(),
        email: format!("{}@example.com", name.to_lowercase()),
        user_name: Some(name.into()),
        phone: None,
        role: Some(role),
        condominium_id: Some(condominium_id),
    }
}

impl TestApp {
    pub fn new() -> Self {
        let condominium_id = CondominiumId::new();
        let mut auth = StubAuth::default();
        auth.tokens
            .insert(ADMIN.into(), claims("Marta", Role::Administrator, condominium_id));
        auth.tokens
            .insert(RESIDENT.into(), claims("Paulo", Role::Resident, condominium_id));
        auth.tokens
            .insert(NEIGHBOUR.into(), claims("Renata", Role::Resident, condominium_id));
        auth.tokens.insert(
            FOREIGN_ADMIN.into(),
            claims("Otávio", Role::Administrator, CondominiumId::new()),
        );

        let registry = AppRegistry::with_store(KvClient::in_memory(), Arc::new(auth));
        Self {
            router: v1::routes().with_state(registry),
            condominium_id,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn send_as<T: DeserializeOwned>(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, T) {
        let (status, value) = self.send(method, uri, Some(token), body).await;
        (status, serde_json::from_value(value).unwrap())
    }

    // síndico として espaço を作成し、その ID を返す
    pub async fn create_space(&self, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/espacos",
                Some(ADMIN),
                Some(serde_json::json!({ "nome": name, "capacidade": 20 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["espaco"]["id"].as_str().unwrap().to_string()
    }
}
