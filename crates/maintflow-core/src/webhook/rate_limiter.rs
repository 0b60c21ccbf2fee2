//! Per-key token bucket rate limiting for the webhook endpoint.
//!
//! Buckets live in a sharded `DashMap`, so requests for unrelated keys only
//! contend when they hash to the same shard. Buckets are created lazily on
//! first use and never evicted: the map grows with the number of distinct
//! keys seen over the process lifetime.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use maintflow_types::config::RateLimitConfig;

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Greedy refill: tokens accrue continuously, capped at `capacity`.
    fn try_consume(&mut self, capacity: f64, per_second: f64, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.tokens = (self.tokens + elapsed.as_secs_f64() * per_second).min(capacity);
        if now > self.last_refill {
            self.last_refill = now;
        }

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Rate limiter keyed by an arbitrary string.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: f64,
    per_second: f64,
}

impl RateLimiter {
    /// `capacity` tokens, refilled at `capacity` per `window`.
    pub fn new(capacity: u32, window: Duration) -> Self {
        let capacity = f64::from(capacity);
        let window = window.as_secs_f64().max(f64::EPSILON);
        Self {
            buckets: DashMap::new(),
            capacity,
            per_second: capacity / window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.window_secs))
    }

    /// Take one token for `key`. `false` means the caller must reject.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// [`allow`](Self::allow) against an explicit clock reading.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        if let Some(mut bucket) = self.buckets.get_mut(key) {
            return bucket.try_consume(self.capacity, self.per_second, now);
        }
        self.buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(self.capacity, now))
            .try_consume(self.capacity, self.per_second, now)
    }

    /// Number of keys with a bucket.
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

/// Bucket key for a webhook API key.
pub fn webhook_key(api_key: &str) -> String {
    format!("webhook:{api_key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_sixteenth_request_is_rejected() {
        let limiter = RateLimiter::default();
        let now = Instant::now();
        for _ in 0..15 {
            assert!(limiter.allow_at("webhook:k", now));
        }
        assert!(!limiter.allow_at("webhook:k", now));
    }

    #[test]
    fn test_full_allowance_after_window() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        for _ in 0..15 {
            assert!(limiter.allow_at("webhook:k", start));
        }
        assert!(!limiter.allow_at("webhook:k", start));

        let later = start + Duration::from_secs(60);
        for _ in 0..15 {
            assert!(limiter.allow_at("webhook:k", later));
        }
        assert!(!limiter.allow_at("webhook:k", later));
    }

    #[test]
    fn test_partial_refill_is_continuous() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        for _ in 0..15 {
            limiter.allow_at("k", start);
        }
        // 15 tokens per 60s is one token every 4s.
        assert!(!limiter.allow_at("k", start + Duration::from_secs(3)));
        assert!(limiter.allow_at("k", start + Duration::from_secs(4)));
        assert!(!limiter.allow_at("k", start + Duration::from_secs(4)));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.allow_at("a", now));
        assert!(!limiter.allow_at("a", now));
        assert!(limiter.allow_at("b", now));
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn test_webhook_key_format() {
        assert_eq!(webhook_key("abc"), "webhook:abc");
    }

    #[test]
    fn test_concurrent_consumers_never_exceed_capacity() {
        let limiter = Arc::new(RateLimiter::new(15, Duration::from_secs(3600)));
        let now = Instant::now();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || (0..10).filter(|_| limiter.allow_at("shared", now)).count())
            })
            .collect();
        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 15);
    }
}
