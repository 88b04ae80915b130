//! # Runtime Collaborators
//!
//! Clock and id generation behind traits, so repositories never reach for
//! ambient wall-clock state or global randomness directly.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Repository code            Production            Tests                 │
//! │                                                                         │
//! │  clock.today()     ◄──────  SystemClock   or     FixedClock            │
//! │  clock.now()                (Utc::now)           (pinned date/time)    │
//! │                                                                         │
//! │  ids.new_id()      ◄──────  UuidIds       or     SequenceIds           │
//! │                             (uuid v4)            (id-1, id-2, ...)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The "current day" decides which session a sale or settlement posts to,
//! so tests pin it instead of depending on when the suite runs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

// =============================================================================
// Clock
// =============================================================================

/// Source of the current date and time.
pub trait Clock: fmt::Debug + Send + Sync {
    /// The current calendar date, keying "today's" session.
    fn today(&self) -> NaiveDate;

    /// The current instant, stamped on created rows.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock pinned to one date and instant (test double).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub date: NaiveDate,
    pub at: DateTime<Utc>,
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

// =============================================================================
// Id Generation
// =============================================================================

/// Source of fresh row identifiers.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    fn new_id(&self) -> String;
}

/// Production generator: UUID v4. Collision-safe, never derived from the
/// wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic generator yielding "id-1", "id-2", ... (test double).
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: AtomicU64,
}

impl IdGenerator for SequenceIds {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("id-{n}")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_pinned() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let at = Utc::now();
        let clock = FixedClock { date, at };
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn test_sequence_ids_are_sequential() {
        let ids = SequenceIds::default();
        assert_eq!(ids.new_id(), "id-1");
        assert_eq!(ids.new_id(), "id-2");
    }

    #[test]
    fn test_uuid_ids_are_distinct() {
        let ids = UuidIds;
        assert_ne!(ids.new_id(), ids.new_id());
    }
}
