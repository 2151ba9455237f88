//! Rate limiting for the public authentication endpoints.

use actix_governor::governor::clock::QuantaInstant;
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};
use log::warn;

/// Requests a single client may fire back to back.
pub const AUTH_BURST_SIZE: u32 = 5;
/// One request is replenished every this many seconds (10 per minute).
pub const AUTH_SECONDS_PER_REQUEST: u64 = 6;

pub type AuthRateLimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Per peer IP limiter for `/api/auth/*`, slowing down credential guessing.
///
/// Build it once and share it: every clone counts against the same buckets.
pub fn create_auth_rate_limiter_config() -> AuthRateLimiterConfig {
    GovernorConfigBuilder::default()
        .seconds_per_request(AUTH_SECONDS_PER_REQUEST)
        .burst_size(AUTH_BURST_SIZE)
        .finish()
        .unwrap_or_else(|| {
            warn!("Invalid auth rate limiter settings, using governor defaults");
            GovernorConfig::default()
        })
}
