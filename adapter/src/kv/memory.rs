use super::KvStore;
use async_trait::async_trait;
use serde_json::Value;
use shared::error::AppResult;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

// 開発・テスト用のメモリ上のストア
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> AppResult<Vec<Value>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn ping(&self) -> bool {
        true
    }
}
