use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::error::AppResult;
use std::sync::Arc;

pub mod key;
pub mod memory;
pub mod postgres;

use memory::InMemoryKvStore;

// キーと JSON 値を保存する汎用ストア
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> AppResult<()>;
    async fn delete(&self, key: &str) -> AppResult<()>;
    // prefix から始まるキーの値をキー順に返す
    async fn get_by_prefix(&self, prefix: &str) -> AppResult<Vec<Value>>;
    async fn ping(&self) -> bool;
}

// 型付きで KvStore を扱うためのラッパー
#[derive(Clone)]
pub struct KvClient(Arc<dyn KvStore>);

impl KvClient {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self(store)
    }

    pub fn in_memory() -> Self {
        Self(Arc::new(InMemoryKvStore::default()))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        self.0
            .get(key)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        self.0.set(key, serde_json::to_value(value)?).await
    }

    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.0.delete(key).await
    }

    pub async fn get_by_prefix<T: DeserializeOwned>(&self, prefix: &str) -> AppResult<Vec<T>> {
        self.0
            .get_by_prefix(prefix)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(Into::into))
            .collect()
    }

    pub async fn ping(&self) -> bool {
        self.0.ping().await
    }
}
