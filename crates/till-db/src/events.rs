//! # Ledger Events
//!
//! Notification stream from the repositories to the presentation layer.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Notification Flow                                 │
//! │                                                                         │
//! │  Repository mutation commits                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NotificationSink::notify(LedgerEvent)                                 │
//! │       │                                                                 │
//! │       ├── TracingSink   → structured log line (default)                │
//! │       └── MemorySink    → captured Vec (tests, assertions)             │
//! │                                                                         │
//! │  Events fire AFTER the transaction commits (success events) or after   │
//! │  the rejection is final (InsufficientStock, OverpaymentRejected):      │
//! │  a sink never observes state that later rolled back.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{info, warn};

use till_core::reconcile::CashCount;
use till_core::types::{MovementKind, PaymentMethod};

// =============================================================================
// LedgerEvent
// =============================================================================

/// Something the dashboard may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    SessionOpened {
        date: NaiveDate,
        opening_cents: i64,
    },
    SessionClosed {
        date: NaiveDate,
        count: CashCount,
    },
    MovementAppended {
        date: NaiveDate,
        movement_id: String,
        kind: MovementKind,
        amount_cents: i64,
    },
    MovementRemoved {
        date: NaiveDate,
        movement_id: String,
    },
    CreditSaleRecorded {
        sale_id: String,
        customer: String,
        total_cents: i64,
    },
    PaymentRecorded {
        sale_id: String,
        amount_cents: i64,
    },
    CreditSaleSettled {
        sale_id: String,
        method: PaymentMethod,
    },
    /// A settling payment committed but its ledger leg could not post
    /// because no session was Open for the day. Never silent: the operator
    /// appends the movement manually once a session is open.
    SettlementPostingDeferred {
        sale_id: String,
        date: NaiveDate,
        reason: String,
    },
    InsufficientStock {
        product_id: String,
    },
    OverpaymentRejected {
        sale_id: String,
        attempted_cents: i64,
    },
}

// =============================================================================
// NotificationSink
// =============================================================================

/// Receiver of ledger events.
pub trait NotificationSink: fmt::Debug + Send + Sync {
    fn notify(&self, event: LedgerEvent);
}

/// Default sink: structured log lines via `tracing`.
///
/// Rejections and deferred postings log at `warn`, everything else at
/// `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: LedgerEvent) {
        match &event {
            LedgerEvent::SettlementPostingDeferred { sale_id, date, reason } => {
                warn!(%sale_id, %date, reason, "settlement ledger leg deferred");
            }
            LedgerEvent::InsufficientStock { product_id } => {
                warn!(%product_id, "sale rejected: insufficient stock");
            }
            LedgerEvent::OverpaymentRejected { sale_id, attempted_cents } => {
                warn!(%sale_id, attempted_cents, "payment rejected: overpayment");
            }
            _ => {
                info!(?event, "ledger event");
            }
        }
    }
}

/// Capturing sink for tests: stores every event in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl MemorySink {
    /// Snapshot of all events received so far.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Drains and returns the captured events.
    pub fn take(&self) -> Vec<LedgerEvent> {
        self.events.lock().map(|mut e| std::mem::take(&mut *e)).unwrap_or_default()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, event: LedgerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_in_order() {
        let sink = MemorySink::default();
        sink.notify(LedgerEvent::MovementRemoved {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            movement_id: "m1".to_string(),
        });
        sink.notify(LedgerEvent::PaymentRecorded {
            sale_id: "s1".to_string(),
            amount_cents: 500,
        });

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LedgerEvent::MovementRemoved { .. }));
        assert!(matches!(events[1], LedgerEvent::PaymentRecorded { .. }));
        assert!(sink.events().is_empty());
    }
}
