use super::KvStore;
use crate::database::ConnectionPool;
use async_trait::async_trait;
use derive_new::new;
use serde_json::Value;
use shared::error::{AppError, AppResult};
use sqlx::types::Json;

// kv_store テーブル（key TEXT PRIMARY KEY, value JSONB）を使うストア
#[derive(new)]
pub struct PgKvStore {
    db: ConnectionPool,
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Json<Value>>("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(self.db.inner_ref())
            .await
            .map(|row| row.map(|Json(v)| v))
            .map_err(AppError::SpecificOperationError)
    }

    async fn set(&self, key: &str, value: Value) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO kv_store (key, value)
                VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(Json(value))
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // key 列は COLLATE "C" なので、範囲条件で主キーのインデックスを使える
    async fn get_by_prefix(&self, prefix: &str) -> AppResult<Vec<Value>> {
        let query = match prefix_upper_bound(prefix) {
            Some(upper) => sqlx::query_scalar::<_, Json<Value>>(
                r#"
                    SELECT value FROM kv_store
                    WHERE key >= $1 AND key < $2
                    ORDER BY key
                "#,
            )
            .bind(prefix)
            .bind(upper),
            None => sqlx::query_scalar::<_, Json<Value>>(
                "SELECT value FROM kv_store WHERE key >= $1 ORDER BY key",
            )
            .bind(prefix),
        };
        query
            .fetch_all(self.db.inner_ref())
            .await
            .map(|rows| rows.into_iter().map(|Json(v)| v).collect())
            .map_err(AppError::SpecificOperationError)
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(self.db.inner_ref())
            .await
            .is_ok()
    }
}

// prefix で始まるキーの直後に来る最小の文字列。存在しなければ None
fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = (last as u32 + 1..=char::MAX as u32).find_map(char::from_u32) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}
