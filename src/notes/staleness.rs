//! Age-based note freshness policy

use super::record::NoteRecord;
use chrono::{DateTime, Duration, Utc};

/// Pure age-based freshness predicate. The orchestrator never hard-codes
/// an expiry; it asks this policy.
#[derive(Debug, Clone, Copy)]
pub struct StalenessPolicy {
    max_age: Duration,
}

impl StalenessPolicy {
    /// Policy with an explicit maximum age
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Policy from a configured hour count
    pub fn from_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    /// A record is fresh iff `now - timestamp < max_age` (strict).
    pub fn is_fresh(&self, record: &NoteRecord, now: DateTime<Utc>) -> bool {
        now - record.timestamp < self.max_age
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from_hours(24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::record::NoteLevel;
    use serde_json::json;

    fn record_at(timestamp: DateTime<Utc>) -> NoteRecord {
        let mut record = NoteRecord::new("owner", "p", NoteLevel::File, json!({}));
        record.timestamp = timestamp;
        record
    }

    #[test]
    fn test_staleness_boundary() {
        let policy = StalenessPolicy::from_hours(24);
        let now = Utc::now();

        // 24h + 1ms old: stale
        let old = record_at(now - Duration::hours(24) - Duration::milliseconds(1));
        assert!(!policy.is_fresh(&old, now));

        // 24h - 1ms old: fresh
        let recent = record_at(now - Duration::hours(24) + Duration::milliseconds(1));
        assert!(policy.is_fresh(&recent, now));
    }

    #[test]
    fn test_exact_max_age_is_stale() {
        let policy = StalenessPolicy::from_hours(24);
        let now = Utc::now();
        let exact = record_at(now - Duration::hours(24));
        assert!(!policy.is_fresh(&exact, now));
    }

    #[test]
    fn test_brand_new_record_is_fresh() {
        let policy = StalenessPolicy::default();
        let now = Utc::now();
        assert!(policy.is_fresh(&record_at(now), now));
    }
}
