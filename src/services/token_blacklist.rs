//! Server-side revocation of bearer tokens.
//!
//! Logged-out tokens are remembered (as a hash) until their own `exp` passes,
//! after which they would be rejected by signature validation anyway.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use log::{debug, info};
use tokio::sync::RwLock;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct TokenBlacklist {
    /// token hash -> instant at which the entry may be dropped
    revoked: Arc<DashMap<u64, Instant>>,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            revoked: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Revoke `token` until `exp` (Unix seconds). Already expired tokens are ignored.
    pub async fn revoke(&self, token: &str, exp: usize) {
        let now = Utc::now().timestamp().max(0) as u64;
        let exp = exp as u64;

        if exp > now {
            let ttl = Duration::from_secs(exp - now);
            self.revoked.insert(fingerprint(token), Instant::now() + ttl);
            debug!("Token revoked for the next {:?}", ttl);
        }

        self.maybe_cleanup().await;
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        let key = fingerprint(token);
        let still_valid = match self.revoked.get(&key) {
            Some(expires_at) => *expires_at > Instant::now(),
            None => return false,
        };
        if !still_valid {
            self.revoked.remove(&key);
        }
        still_valid
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }

    async fn maybe_cleanup(&self) {
        if self.last_cleanup.read().await.elapsed() < CLEANUP_INTERVAL {
            return;
        }

        let mut last = self.last_cleanup.write().await;
        if last.elapsed() >= CLEANUP_INTERVAL {
            self.purge_expired();
            *last = Instant::now();
        }
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);

        let removed = before - self.revoked.len();
        if removed > 0 {
            info!(
                "Token blacklist cleanup: removed {} expired entries, {} remaining",
                removed,
                self.revoked.len()
            );
        }
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

fn fingerprint(token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_one_hour() -> usize {
        (Utc::now().timestamp() + 3600) as usize
    }

    #[actix_rt::test]
    async fn test_revoked_token_is_rejected() {
        let blacklist = TokenBlacklist::new();
        assert!(!blacklist.is_revoked("abc"));

        blacklist.revoke("abc", in_one_hour()).await;
        assert!(blacklist.is_revoked("abc"));
        assert!(!blacklist.is_revoked("abd"));
        assert_eq!(blacklist.len(), 1);
    }

    #[actix_rt::test]
    async fn test_expired_token_is_not_stored() {
        let blacklist = TokenBlacklist::new();
        let past = (Utc::now().timestamp() - 10) as usize;
        blacklist.revoke("old", past).await;
        assert!(blacklist.is_empty());
        assert!(!blacklist.is_revoked("old"));
    }

    #[actix_rt::test]
    async fn test_clones_share_state() {
        let blacklist = TokenBlacklist::new();
        let clone = blacklist.clone();
        clone.revoke("shared", in_one_hour()).await;
        assert!(blacklist.is_revoked("shared"));
    }

    #[test]
    fn test_purge_drops_only_expired_entries() {
        let blacklist = TokenBlacklist::new();
        blacklist
            .revoked
            .insert(fingerprint("gone"), Instant::now() - Duration::from_secs(1));
        blacklist
            .revoked
            .insert(fingerprint("kept"), Instant::now() + Duration::from_secs(60));
        blacklist.purge_expired();
        assert_eq!(blacklist.len(), 1);
        assert!(blacklist.is_revoked("kept"));
    }
}
