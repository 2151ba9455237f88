use std::env;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::warn;

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}

/// Which persistence layer the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::MongoDb => "mongodb",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub server_base_url: String,
    pub storage_backend: StorageBackend,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub max_login_attempts: u32,
    pub retention_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_env("SERVER_PORT", 8080),
            server_base_url: env::var("SERVER_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            storage_backend: parse_env("STORAGE_BACKEND", StorageBackend::MongoDb),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "user_management".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-super-secret-jwt-key-change-in-production".to_string()),
            jwt_expiration_hours: parse_env("JWT_EXPIRATION_HOURS", 24),
            bcrypt_cost: parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST),
            max_login_attempts: parse_env("MAX_LOGIN_ATTEMPTS", 3),
            retention_interval_secs: parse_env("RETENTION_INTERVAL_SECS", 3600),
        }
    }
}

/// Read `key` from the environment, falling back to `default` when it is unset
/// or cannot be parsed.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(
                "Ignoring invalid value for {} ({}), using default {:?}",
                key, e, default
            );
            default
        }),
        Err(_) => default,
    }
}
