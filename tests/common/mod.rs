//! Shared fixtures for the HTTP integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use mongodb::bson::DateTime;
use user_management::models::{Role, User};
use user_management::repositories::{
    InMemoryRetentionRepository, InMemoryUserRepository, UserRepository,
};
use user_management::services::auth_service::generate_token;
use user_management::services::MemoryMailer;
use user_management::AppState;

pub const PASSWORD: &str = "Secret#123";

pub struct TestContext {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub mailer: Arc<MemoryMailer>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::new(
            users.clone(),
            Arc::new(InMemoryRetentionRepository::new()),
            mailer.clone(),
        );
        Self {
            state,
            users,
            mailer,
        }
    }

    /// Insert a user directly, bypassing registration. Password is `PASSWORD`.
    pub async fn seed(&self, nickname: &str, role: Role, verified: bool) -> User {
        let mut user = User::new(
            nickname.to_string(),
            &format!("{}@example.com", nickname),
            role,
        );
        user.email_verified = verified;
        user.password_hash = Some(bcrypt::hash(PASSWORD, 4).unwrap());
        self.users.insert(&user).await.unwrap();
        user
    }

    /// Insert a user without a password hash, created at `created_millis`.
    pub async fn seed_bare(&self, nickname: &str, role: Role, created_millis: i64) -> User {
        let mut user = User::new(
            nickname.to_string(),
            &format!("{}@example.com", nickname),
            role,
        );
        user.created_at = DateTime::from_millis(created_millis);
        user.updated_at = user.created_at;
        self.users.insert(&user).await.unwrap();
        user
    }

    pub async fn reload(&self, user: &User) -> User {
        self.users.find_by_id(user.id).await.unwrap().unwrap()
    }
}

pub fn bearer(user: &User) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", generate_token(user).unwrap()))
}

/// Distinct client address per call site so the auth rate limiter stays out of the way.
pub fn peer(n: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, n], 40_000))
}

/// Build the full application against the context's in-memory state.
#[macro_export]
macro_rules! spawn_app {
    ($ctx:expr) => {{
        let state = $ctx.state.clone();
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}
