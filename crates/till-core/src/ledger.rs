//! # Movement Ledger
//!
//! Append-only transaction log scoped to one cash session, with derived
//! aggregates. This module holds the pure half: the session state machine
//! guards and the folds over the raw movement list. The storage half (one
//! transaction per append/remove) lives in `till-db`.
//!
//! ## Accumulator Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CACHE, NEVER AUTHORITY                                                 │
//! │                                                                         │
//! │  append(movement)                                                       │
//! │       │                                                                 │
//! │       ├── movement row INSERT          ┐ one transaction:              │
//! │       └── accumulators += amount       ┘ a crash between them          │
//! │                                          must not be observable        │
//! │                                                                         │
//! │  At any point:                                                          │
//! │    totals(raw movement list) == cached accumulators                     │
//! │                                                                         │
//! │  After a crash that broke the invariant:                                │
//! │    the raw list wins; verify_cached_totals() detects the drift and     │
//! │    the session manager repairs the cache on load                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::reconcile::{self, CashCount};
use crate::types::{CashSession, Movement, MovementKind, PaymentMethod, SessionStatus};
use crate::validation::{validate_movement_amount, validate_opening_amount};

// =============================================================================
// Session State Machine
// =============================================================================

impl CashSession {
    /// Creates a new Open session for a date.
    ///
    /// Fails with a validation error on a negative opening amount. The
    /// one-session-per-date uniqueness check belongs to the session
    /// manager (it needs storage to answer it).
    pub fn open(date: NaiveDate, opening: Money, opened_at: DateTime<Utc>) -> CoreResult<Self> {
        validate_opening_amount(opening.cents())?;

        Ok(CashSession {
            date,
            status: SessionStatus::Open,
            opening_cents: opening.cents(),
            income_cents: 0,
            expense_cents: 0,
            profit_cents: 0,
            counted_cents: None,
            difference_cents: None,
            opened_at,
            closed_at: None,
            version: 0,
        })
    }

    /// Fails with SessionState unless this session is Open.
    pub fn ensure_open(&self, operation: &str) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::session_state(
                self.date,
                self.status.as_str(),
                operation,
            ))
        }
    }

    /// Applies a movement append to the cached accumulators.
    ///
    /// Guards session state and validates the amount BEFORE mutating, so a
    /// failure leaves the session untouched. The caller persists the
    /// movement row and the new accumulator values in one transaction.
    pub fn apply_append(&mut self, movement: &Movement) -> CoreResult<()> {
        self.ensure_open("append movement")?;
        validate_movement_amount(movement.amount_cents)?;

        match movement.kind {
            MovementKind::Income => self.income_cents += movement.amount_cents,
            MovementKind::Expense => self.expense_cents += movement.amount_cents,
        }
        self.profit_cents += movement.source.profit_cents();

        Ok(())
    }

    /// Reverses a movement's accumulator effect (the delete correction).
    pub fn apply_remove(&mut self, movement: &Movement) -> CoreResult<()> {
        self.ensure_open("remove movement")?;

        match movement.kind {
            MovementKind::Income => self.income_cents -= movement.amount_cents,
            MovementKind::Expense => self.expense_cents -= movement.amount_cents,
        }
        self.profit_cents -= movement.source.profit_cents();

        Ok(())
    }

    /// Closes the session against a counted drawer amount.
    ///
    /// Computes the reconciliation snapshot from the raw movement list,
    /// freezes the session and writes the closing fields exactly once.
    /// Closing an already-Closed session is a hard error, never a no-op:
    /// a double-close means two people counted the same drawer.
    pub fn close(
        &mut self,
        movements: &[Movement],
        counted: Money,
        closed_at: DateTime<Utc>,
    ) -> CoreResult<CashCount> {
        self.ensure_open("close session")?;

        let count = reconcile::reconcile(self.opening(), movements, counted);

        self.status = SessionStatus::Closed;
        self.counted_cents = Some(count.counted_cents);
        self.difference_cents = Some(count.difference_cents);
        self.closed_at = Some(closed_at);

        Ok(count)
    }
}

// =============================================================================
// Aggregate Folds
// =============================================================================

/// Totals recomputed from a raw movement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub income: Money,
    pub expense: Money,
    pub profit: Money,
}

/// Pure fold over the movement list. Order-independent.
pub fn totals(movements: &[Movement]) -> LedgerTotals {
    movements.iter().fold(LedgerTotals::default(), |mut acc, m| {
        match m.kind {
            MovementKind::Income => acc.income += m.amount(),
            MovementKind::Expense => acc.expense += m.amount(),
        }
        acc.profit += m.profit();
        acc
    })
}

/// Sum of movement amounts of one kind.
pub fn total_by_kind(movements: &[Movement], kind: MovementKind) -> Money {
    movements
        .iter()
        .filter(|m| m.kind == kind)
        .map(Movement::amount)
        .sum()
}

/// Sum of movement amounts of one kind settled by one method.
pub fn total_by_method(movements: &[Movement], kind: MovementKind, method: PaymentMethod) -> Money {
    movements
        .iter()
        .filter(|m| m.kind == kind && m.method == method)
        .map(Movement::amount)
        .sum()
}

// =============================================================================
// Movement Filter
// =============================================================================

/// Kind/method predicates for reporting queries.
///
/// Produces a lazy, restartable iterator over a movement slice; calling
/// [`MovementFilter::iter`] again restarts from the beginning. Never
/// mutates anything.
///
/// ## Example
/// ```rust,ignore
/// let cash_income = MovementFilter::new()
///     .kind(MovementKind::Income)
///     .method(PaymentMethod::Cash);
/// for m in cash_income.iter(&movements) { /* render row */ }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementFilter {
    kind: Option<MovementKind>,
    method: Option<PaymentMethod>,
    settlements_only: bool,
}

impl MovementFilter {
    /// A filter matching every movement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one movement kind.
    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to one payment method.
    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Restrict to credit-sale settlement movements.
    pub fn settlements_only(mut self) -> Self {
        self.settlements_only = true;
        self
    }

    /// Whether a movement passes all configured predicates.
    pub fn matches(&self, movement: &Movement) -> bool {
        if let Some(kind) = self.kind {
            if movement.kind != kind {
                return false;
            }
        }
        if let Some(method) = self.method {
            if movement.method != method {
                return false;
            }
        }
        if self.settlements_only && !movement.source.is_settlement() {
            return false;
        }
        true
    }

    /// Lazy iterator over matching movements, in insertion order.
    pub fn iter<'a>(&'a self, movements: &'a [Movement]) -> impl Iterator<Item = &'a Movement> {
        movements.iter().filter(move |m| self.matches(m))
    }
}

// =============================================================================
// Cache Drift Detection
// =============================================================================

/// Cached accumulators disagreeing with the raw movement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDrift {
    pub cached: LedgerTotals,
    pub recomputed: LedgerTotals,
}

/// Compares a session's cached accumulators against a recomputation from
/// the raw movement list.
///
/// `Err(CacheDrift)` means a past multi-step write was torn (crash between
/// movement insert and accumulator update). The raw list is the source of
/// truth; the session manager repairs the cache and logs the repair.
pub fn verify_cached_totals(
    session: &CashSession,
    movements: &[Movement],
) -> Result<(), CacheDrift> {
    let recomputed = totals(movements);
    let cached = LedgerTotals {
        income: session.income(),
        expense: session.expense(),
        profit: Money::from_cents(session.profit_cents),
    };

    if cached == recomputed {
        Ok(())
    } else {
        Err(CacheDrift { cached, recomputed })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
