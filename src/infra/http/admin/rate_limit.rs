use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest key kept; RFC 5321 caps a mailbox at 254 characters.
const MAX_KEY_CHARS: usize = 254;

/// Sliding-window counter of failed sign-in attempts, keyed by normalized email.
#[derive(Debug, Clone)]
pub struct LoginThrottle {
    window: Duration,
    max_failures: u32,
    failures: Arc<DashMap<String, Vec<Instant>>>,
}

impl LoginThrottle {
    pub fn new(window: Duration, max_failures: u32) -> Self {
        Self {
            window,
            max_failures,
            failures: Arc::new(DashMap::new()),
        }
    }

    pub fn is_blocked(&self, key: &str) -> bool {
        self.is_blocked_at(key, Instant::now())
    }

    pub fn record_failure(&self, key: &str) {
        self.record_failure_at(key, Instant::now());
    }

    /// Forget failures after a successful sign-in.
    pub fn reset(&self, key: &str) {
        self.failures.remove(bounded_key(key));
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    fn is_blocked_at(&self, key: &str, now: Instant) -> bool {
        let key = bounded_key(key);
        let window = self.window;
        let blocked = match self.failures.get_mut(key) {
            Some(mut entry) => {
                entry.retain(|instant| now.duration_since(*instant) < window);
                entry.len() as u32 >= self.max_failures
            }
            None => return false,
        };
        self.failures.remove_if(key, |_, attempts| attempts.is_empty());
        blocked
    }

    fn record_failure_at(&self, key: &str, now: Instant) {
        let window = self.window;
        self.failures.retain(|_, attempts| {
            attempts.retain(|instant| now.duration_since(*instant) < window);
            !attempts.is_empty()
        });
        self.failures
            .entry(bounded_key(key).to_string())
            .or_default()
            .push(now);
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.failures.len()
    }
}

fn bounded_key(key: &str) -> &str {
    match key.char_indices().nth(MAX_KEY_CHARS) {
        Some((end, _)) => &key[..end],
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_max_failures_within_window() {
        let throttle = LoginThrottle::new(Duration::from_secs(60), 3);
        let start = Instant::now();
        for _ in 0..2 {
            throttle.record_failure_at("admin@example.com", start);
        }
        assert!(!throttle.is_blocked_at("admin@example.com", start));

        throttle.record_failure_at("admin@example.com", start);
        assert!(throttle.is_blocked_at("admin@example.com", start));
        assert!(!throttle.is_blocked_at("other@example.com", start));
    }

    #[test]
    fn failures_expire_and_reset() {
        let throttle = LoginThrottle::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        throttle.record_failure_at("admin@example.com", start);
        assert!(throttle.is_blocked_at("admin@example.com", start));
        assert!(!throttle.is_blocked_at("admin@example.com", start + Duration::from_secs(61)));

        throttle.record_failure_at("admin@example.com", start);
        throttle.reset("admin@example.com");
        assert!(!throttle.is_blocked_at("admin@example.com", start));
    }

    #[test]
    fn expired_keys_are_dropped() {
        let throttle = LoginThrottle::new(Duration::from_secs(60), 5);
        let start = Instant::now();
        for n in 0..2_000 {
            throttle.record_failure_at(&format!("user{n}@example.com"), start);
        }
        assert_eq!(throttle.tracked_keys(), 2_000);

        let later = start + Duration::from_secs(3600);
        for n in 0..2_000 {
            assert!(!throttle.is_blocked_at(&format!("user{n}@example.com"), later));
        }
        assert_eq!(throttle.tracked_keys(), 0);
    }

    #[test]
    fn recording_sweeps_stale_keys() {
        let throttle = LoginThrottle::new(Duration::from_secs(60), 5);
        let start = Instant::now();
        throttle.record_failure_at("old@example.com", start);
        throttle.record_failure_at("new@example.com", start + Duration::from_secs(120));
        assert_eq!(throttle.tracked_keys(), 1);
    }

    #[test]
    fn oversized_keys_share_one_bounded_entry() {
        let throttle = LoginThrottle::new(Duration::from_secs(60), 2);
        let start = Instant::now();
        let base = "a".repeat(MAX_KEY_CHARS);
        throttle.record_failure_at(&format!("{base}x"), start);
        throttle.record_failure_at(&format!("{base}y"), start);
        assert_eq!(throttle.tracked_keys(), 1);
        assert!(throttle.is_blocked_at(&base, start));
    }
}
