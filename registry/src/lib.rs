use std::sync::Arc;

use adapter::kv::{postgres::PgKvStore, KvClient};
use adapter::redis::RedisClient;
use adapter::repository::{
    auth::AuthRepositoryImpl, health::HealthCheckRepositoryImpl,
    reservation::ReservationRepositoryImpl, space::SpaceRepositoryImpl, user::UserRepositoryImpl,
};
use adapter::database::ConnectionPool;
use kernel::repository::{
    auth::AuthRepository, health::HealthCheckRepository, reservation::ReservationRepository,
    space::SpaceRepository, user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    user_repository: Arc<dyn UserRepository>,
    space_repository: Arc<dyn SpaceRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let kv = KvClient::new(Arc::new(PgKvStore::new(pool)));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            redis_client,
            app_config.identity,
            app_config.auth.ttl,
        ));
        Self::with_store(kv, auth_repository)
    }

    // ストアと認証基盤を差し替えて組み立てる（テストではメモリ上のストアを使う）
    pub fn with_store(kv: KvClient, auth_repository: Arc<dyn AuthRepository>) -> Self {
        Self {
            health_check_repository: Arc::new(HealthCheckRepositoryImpl::new(kv.clone())),
            auth_repository,
            user_repository: Arc::new(UserRepositoryImpl::new(kv.clone())),
            space_repository: Arc::new(SpaceRepositoryImpl::new(kv.clone())),
            reservation_repository: Arc::new(ReservationRepositoryImpl::new(kv)),
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn space_repository(&self) -> Arc<dyn SpaceRepository> {
        self.space_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }
}
