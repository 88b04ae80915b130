//! # Reconciliation Engine
//!
//! Pure computation of expected-vs-counted cash at session close.
//!
//! ## What Counts Toward the Drawer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cash Reconciliation                                  │
//! │                                                                         │
//! │  opening amount                                 + 1000.00              │
//! │  income, method = Cash                          +  500.00              │
//! │  income, method = Transfer/Card    (informational only, not drawer)    │
//! │  expenses (ALL methods)                         −  200.00              │
//! │                                                 ─────────              │
//! │  expected cash                                    1300.00              │
//! │  counted cash (physically counted)                1300.00              │
//! │                                                 ─────────              │
//! │  difference                                          0.00              │
//! │                                                                         │
//! │  positive difference = surplus, negative = shortage                    │
//! │  exact integer-cent comparison, no rounding tolerance                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expenses are treated as cash-settled regardless of their method field;
//! the register workflow pays suppliers and errands out of the drawer.
//!
//! This module never persists anything: the session manager is solely
//! responsible for freezing the snapshot into the closing fields.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Movement, MovementKind, PaymentMethod};

// =============================================================================
// CashCount
// =============================================================================

/// The reconciliation snapshot computed at session close.
///
/// Deterministic over (opening, movement list, counted); persisted by the
/// session manager as the session's immutable closing fields and carried
/// on the `SessionClosed` event for the dashboard's closing dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashCount {
    /// Cash in the drawer at open.
    pub opening_cents: i64,

    /// Sum of Income movements with method Cash.
    pub cash_income_cents: i64,

    /// Sum of ALL Expense movements (expenses settle from the drawer).
    pub cash_expense_cents: i64,

    /// Sum of Income movements with non-cash methods. Informational:
    /// displayed at close, excluded from the drawer expectation.
    pub other_income_cents: i64,

    /// opening + cash income − cash expense.
    pub expected_cents: i64,

    /// What was physically counted.
    pub counted_cents: i64,

    /// counted − expected. Positive = surplus, negative = shortage.
    pub difference_cents: i64,
}

impl CashCount {
    #[inline]
    pub fn expected(&self) -> Money {
        Money::from_cents(self.expected_cents)
    }

    #[inline]
    pub fn difference(&self) -> Money {
        Money::from_cents(self.difference_cents)
    }

    /// Counted matches expected to the cent.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.difference_cents == 0
    }

    /// More in the drawer than the ledger expects.
    #[inline]
    pub fn is_surplus(&self) -> bool {
        self.difference_cents > 0
    }

    /// Less in the drawer than the ledger expects.
    #[inline]
    pub fn is_shortage(&self) -> bool {
        self.difference_cents < 0
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Computes the closing snapshot for a session.
///
/// Pure fold over the raw movement list plus the opening amount; no side
/// effects, no rounding tolerance.
pub fn reconcile(opening: Money, movements: &[Movement], counted: Money) -> CashCount {
    let mut cash_income = Money::zero();
    let mut cash_expense = Money::zero();
    let mut other_income = Money::zero();

    for m in movements {
        match (m.kind, m.method) {
            (MovementKind::Income, PaymentMethod::Cash) => cash_income += m.amount(),
            (MovementKind::Income, _) => other_income += m.amount(),
            // Expenses settle from the drawer regardless of method field
            (MovementKind::Expense, _) => cash_expense += m.amount(),
        }
    }

    let expected = opening + cash_income - cash_expense;
    let difference = counted - expected;

    CashCount {
        opening_cents: opening.cents(),
        cash_income_cents: cash_income.cents(),
        cash_expense_cents: cash_expense.cents(),
        other_income_cents: other_income.cents(),
        expected_cents: expected.cents(),
        counted_cents: counted.cents(),
        difference_cents: difference.cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
