use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use governor::{clock::Clock, clock::DefaultClock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// How often idle per-user buckets are dropped.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Per-user request limiter, owned by `AppState` and handed to the routes that
/// need it. Cloning shares the same buckets.
#[derive(Clone)]
pub struct UserRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<Uuid>>,
    clock: DefaultClock,
}

impl UserRateLimiter {
    pub fn per_minute(requests: u32) -> Result<Self> {
        let requests = NonZeroU32::new(requests)
            .ok_or_else(|| anyhow!("rate limit must allow at least one request per minute"))?;
        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(requests))),
            clock: DefaultClock::default(),
        })
    }

    /// Consumes one request from `user_id`'s bucket.
    pub fn check(&self, user_id: Uuid) -> Result<(), AppError> {
        self.limiter.check_key(&user_id).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            let retry_after_secs = wait.as_secs().max(1);
            warn!(user_id = %user_id, retry_after_secs, "Rate limit exceeded");
            AppError::RateLimited { retry_after_secs }
        })
    }

    /// Number of users currently tracked.
    pub fn tracked_users(&self) -> usize {
        self.limiter.len()
    }

    /// Spawns the background task that forgets users whose buckets have fully
    /// refilled. Abort the returned handle on shutdown.
    pub fn spawn_pruner(&self) -> JoinHandle<()> {
        let limiter = Arc::clone(&self.limiter);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
            loop {
                ticker.tick().await;
                limiter.retain_recent();
                limiter.shrink_to_fit();
                debug!(tracked = limiter.len(), "Pruned rate limiter buckets");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quota_rejected() {
        assert!(UserRateLimiter::per_minute(0).is_err());
    }

    #[test]
    fn test_allows_up_to_quota_then_limits() {
        let limiter = UserRateLimiter::per_minute(2).unwrap();
        let user = Uuid::new_v4();

        assert!(limiter.check(user).is_ok());
        assert!(limiter.check(user).is_ok());
        match limiter.check(user) {
            Err(AppError::RateLimited { retry_after_secs }) => assert!(retry_after_secs >= 1),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_users_have_independent_buckets() {
        let limiter = UserRateLimiter::per_minute(1).unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(limiter.check(alice).is_ok());
        assert!(limiter.check(alice).is_err());
        assert!(limiter.check(bob).is_ok());
        assert_eq!(limiter.tracked_users(), 2);
    }

    #[test]
    fn test_clones_share_buckets() {
        let limiter = UserRateLimiter::per_minute(1).unwrap();
        let shared = limiter.clone();
        let user = Uuid::new_v4();

        assert!(limiter.check(user).is_ok());
        assert!(shared.check(user).is_err());
    }
}
