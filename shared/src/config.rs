use anyhow::{Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub identity: IdentityConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        let auth = AuthConfig {
            ttl: std::env::var("AUTH_TOKEN_TTL")?
                .parse()
                .context("AUTH_TOKEN_TTL must be a number of seconds")?,
        };
        let identity = IdentityConfig {
            url: std::env::var("IDENTITY_URL")?,
            api_key: std::env::var("IDENTITY_API_KEY")?,
            anon_key: std::env::var("IDENTITY_ANON_KEY").ok(),
            timeout_secs: optional_number("IDENTITY_TIMEOUT_SECS", 10)?,
        };
        let server = ServerConfig {
            port: optional_number("SERVER_PORT", 8080)?,
        };
        Ok(Self {
            database,
            redis,
            auth,
            identity,
            server,
        })
    }
}

fn optional_number<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(v) => v.parse().with_context(|| format!("{name} must be a number")),
        Err(_) => Ok(default),
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    // 認証結果を Redis にキャッシュする秒数
    pub ttl: u64,
}

#[derive(Clone)]
pub struct IdentityConfig {
    pub url: String,
    pub api_key: String,
    // 認証基盤の公開キー。ユーザーのトークンとしては受け付けない
    pub anon_key: Option<String>,
    pub timeout_secs: u64,
}

pub struct ServerConfig {
    pub port: u16,
}
