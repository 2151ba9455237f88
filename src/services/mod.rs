//! Services organized by domain concern.

pub mod analytics_service;
pub mod auth_service;
pub mod email_service;
pub mod token_blacklist;
pub mod user_service;

pub use analytics_service::AnalyticsService;
pub use auth_service::AuthService;
pub use email_service::{LogMailer, Mailer, MemoryMailer};
pub use token_blacklist::TokenBlacklist;
pub use user_service::UserService;
