//! Refetch policy and coordinator configuration.

use std::time::Duration;
use tokio::time::Instant;

/// What happens when a subscriber attaches to an entry that already has data.
///
/// Invalidated entries and entries without data always fetch, whatever the
/// policy says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchPolicy {
    /// Refetch on every mount.
    Always,
    /// Refetch when the data is older than the given age.
    IfStale(Duration),
    /// Only invalidation or an explicit refetch fetches again.
    Never,
}

impl RefetchPolicy {
    pub fn should_refetch(&self, fetched_at: Option<Instant>, now: Instant) -> bool {
        match self {
            RefetchPolicy::Always => true,
            RefetchPolicy::Never => false,
            RefetchPolicy::IfStale(max_age) => match fetched_at {
                Some(at) => now.saturating_duration_since(at) >= *max_age,
                None => true,
            },
        }
    }
}

/// Coordinator-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Age after which data counts as stale. Zero means always stale.
    pub stale_time: Duration,
    /// How long an entry without subscribers survives before `gc` evicts it.
    pub gc_grace: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_grace: Duration::from_secs(300),
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_gc_grace(mut self, gc_grace: Duration) -> Self {
        self.gc_grace = gc_grace;
        self
    }

    /// Policy used by pages that do not pick one explicitly.
    pub fn default_policy(&self) -> RefetchPolicy {
        if self.stale_time.is_zero() {
            RefetchPolicy::Always
        } else {
            RefetchPolicy::IfStale(self.stale_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_stale_compares_age() {
        let start = Instant::now();
        let policy = RefetchPolicy::IfStale(Duration::from_secs(30));
        assert!(!policy.should_refetch(Some(start), start + Duration::from_secs(10)));
        assert!(policy.should_refetch(Some(start), start + Duration::from_secs(30)));
        assert!(policy.should_refetch(None, start));
    }

    #[test]
    fn always_and_never() {
        let now = Instant::now();
        assert!(RefetchPolicy::Always.should_refetch(Some(now), now));
        assert!(!RefetchPolicy::Never.should_refetch(None, now));
    }

    #[test]
    fn default_policy_follows_stale_time() {
        assert_eq!(QueryConfig::default().default_policy(), RefetchPolicy::Always);
        let config = QueryConfig::new().with_stale_time(Duration::from_secs(5));
        assert_eq!(
            config.default_policy(),
            RefetchPolicy::IfStale(Duration::from_secs(5))
        );
    }
}
