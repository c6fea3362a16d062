use crate::kv::KvClient;
use async_trait::async_trait;
use derive_new::new;
use kernel::repository::health::HealthCheckRepository;

#[derive(new)]
pub struct HealthCheckRepositoryImpl {
    kv: KvClient,
}

#[async_trait]
impl HealthCheckRepository for HealthCheckRepositoryImpl {
    async fn check_db(&self) -> bool {
        self.kv.ping().await
    }
}
