//! Per-holder token bucket guarding the presentation query endpoint.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::{Mutex, RwLock};

use crate::common_models::did::DidValue;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Bucket size, and the burst a fresh holder is allowed.
    pub capacity: u32,
    /// Tokens added back per `refill_period`.
    pub refill_tokens: u32,
    pub refill_period: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_tokens: 5,
            refill_period: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: u32, now: Instant) -> Self {
        Self {
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    fn refill(&mut self, config: &RateLimitConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed.is_zero() || config.refill_period.is_zero() {
            return;
        }

        self.tokens = self.available(config, now);
        self.last_refill = now;
    }

    fn available(&self, config: &RateLimitConfig, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if config.refill_period.is_zero() {
            return self.tokens;
        }

        let added =
            elapsed.as_secs_f64() / config.refill_period.as_secs_f64() * config.refill_tokens as f64;
        (self.tokens + added).min(config.capacity as f64)
    }

    fn try_consume(&mut self) -> bool {
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

pub struct PresentationRateLimiter {
    config: RateLimitConfig,
    buckets: RwLock<HashMap<DidValue, Arc<Mutex<TokenBucket>>>>,
}

impl Default for PresentationRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl PresentationRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Takes one token from the holder's bucket; `false` means the request must be refused.
    pub fn try_consume(&self, holder: &DidValue) -> bool {
        self.try_consume_at(holder, Instant::now())
    }

    pub fn try_consume_at(&self, holder: &DidValue, now: Instant) -> bool {
        let bucket = self.bucket(holder, now);
        let mut bucket = bucket.lock();

        bucket.refill(&self.config, now);
        let allowed = bucket.try_consume();
        if !allowed {
            tracing::warn!(%holder, "presentation query rate limit exceeded");
        }
        allowed
    }

    fn bucket(&self, holder: &DidValue, now: Instant) -> Arc<Mutex<TokenBucket>> {
        if let Some(bucket) = self.buckets.read().get(holder) {
            return bucket.clone();
        }

        let mut buckets = self.buckets.write();
        if !buckets.contains_key(holder) {
            // a full bucket nobody holds is indistinguishable from a fresh one
            buckets.retain(|_, bucket| {
                Arc::strong_count(bucket) > 1
                    || bucket.lock().available(&self.config, now) < self.config.capacity as f64
            });
        }

        buckets
            .entry(holder.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::full(self.config.capacity, now))))
            .clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn holder(name: &str) -> DidValue {
        DidValue::from(format!("did:web:{name}.example"))
    }

    #[test]
    fn test_burst_up_to_capacity() {
        let limiter = PresentationRateLimiter::default();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.try_consume_at(&holder("alice"), now));
        }
        assert!(!limiter.try_consume_at(&holder("alice"), now));
    }

    #[test]
    fn test_buckets_are_per_holder() {
        let limiter = PresentationRateLimiter::default();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.try_consume_at(&holder("alice"), now));
        }
        assert!(!limiter.try_consume_at(&holder("alice"), now));
        assert!(limiter.try_consume_at(&holder("bob"), now));
    }

    #[test]
    fn test_refill_over_time() {
        let limiter = PresentationRateLimiter::default();
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.try_consume_at(&holder("alice"), start));
        }
        assert!(!limiter.try_consume_at(&holder("alice"), start));

        // one token every 12 seconds
        let later = start + Duration::from_secs(13);
        assert!(limiter.try_consume_at(&holder("alice"), later));
        assert!(!limiter.try_consume_at(&holder("alice"), later));
    }

    #[test]
    fn test_refill_is_capped_at_capacity() {
        let limiter = PresentationRateLimiter::new(RateLimitConfig {
            capacity: 2,
            refill_tokens: 2,
            refill_period: Duration::from_secs(60),
        });
        let start = Instant::now();
        assert!(limiter.try_consume_at(&holder("alice"), start));

        let much_later = start + Duration::from_secs(3600);
        assert!(limiter.try_consume_at(&holder("alice"), much_later));
        assert!(limiter.try_consume_at(&holder("alice"), much_later));
        assert!(!limiter.try_consume_at(&holder("alice"), much_later));
    }

    #[test]
    fn test_idle_buckets_are_dropped() {
        let limiter = PresentationRateLimiter::default();
        let start = Instant::now();

        assert!(limiter.try_consume_at(&holder("alice"), start));
        for _ in 0..5 {
            assert!(limiter.try_consume_at(&holder("bob"), start));
        }

        let later = start + Duration::from_secs(30);
        assert!(limiter.try_consume_at(&holder("carol"), later));
        {
            let buckets = limiter.buckets.read();
            assert!(!buckets.contains_key(&holder("alice")));
            assert!(buckets.contains_key(&holder("bob")));
            assert!(buckets.contains_key(&holder("carol")));
        }

        // bob is still limited after the prune
        assert!(limiter.try_consume_at(&holder("bob"), later));
        assert!(limiter.try_consume_at(&holder("bob"), later));
        assert!(!limiter.try_consume_at(&holder("bob"), later));
    }

    #[test]
    fn test_concurrent_consumers_never_exceed_capacity() {
        let limiter = Arc::new(PresentationRateLimiter::new(RateLimitConfig {
            capacity: 20,
            refill_tokens: 0,
            refill_period: Duration::from_secs(60),
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .filter(|_| limiter.try_consume(&holder("alice")))
                        .count()
                })
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 20);
    }
}
