//! # Domain Types
//!
//! Core domain types for the daily cash ledger and credit subledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CashSession   │   │    Movement     │   │   CreditSale    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  date (KEY)     │◄──│  session_date   │   │  id (UUID)      │       │
//! │  │  status         │   │  kind/method    │   │  customer       │       │
//! │  │  opening_cents  │   │  amount_cents   │   │  total_cents    │       │
//! │  │  cached totals  │   │  source (tag)   │   │  paid flag      │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │    Product      │   │  CreditPayment  │   │   CreditLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  stock (base    │   │  sale_id (FK)   │   │  sale_id (FK)   │       │
//! │  │  milli + unit)  │   │  amount_cents   │   │  qty + unit     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! - `CashSession` is keyed by its calendar date: one session per date,
//!   enforced by the primary key itself
//! - Everything else carries a UUID v4 issued by the id generator
//!   collaborator (never derived from the wall clock)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::units::{BaseQuantity, Quantity, Unit};

// =============================================================================
// Session Status
// =============================================================================

/// Lifecycle state of a stored cash session.
///
/// A date with no stored session at all is the third, implicit state
/// ("absent"); the session manager reports it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting movements.
    Open,
    /// Terminal. Movement list and opening amount are frozen.
    Closed,
}

impl SessionStatus {
    /// Lowercase name, used in session-state error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Closed => "closed",
        }
    }
}

// =============================================================================
// Movement Kind & Payment Method
// =============================================================================

/// Direction of a movement relative to the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Income,
    Expense,
}

/// How money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash. The only method that affects drawer reconciliation.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Card terminal.
    Card,
}

// =============================================================================
// Movement Source
// =============================================================================

/// What produced a movement. Tagged variants instead of a bag of optional
/// fields: each variant carries exactly the fields that exist for it.
///
/// Persisted as a JSON column (`serde` tagged representation), so the
/// stored shape is stable for backup/restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovementSource {
    /// Hand-entered income or expense (e.g. "bought cleaning supplies").
    Manual,
    /// A sale paid on the spot.
    Sale {
        sale_id: String,
        product_id: String,
        /// (sell price − cost price) scaled by the sold quantity.
        profit_cents: i64,
    },
    /// The settling payment of a credit sale reaching zero balance.
    Settlement { sale_id: String },
}

impl MovementSource {
    /// Profit contributed to the session's profit accumulator.
    pub fn profit_cents(&self) -> i64 {
        match self {
            MovementSource::Sale { profit_cents, .. } => *profit_cents,
            MovementSource::Manual | MovementSource::Settlement { .. } => 0,
        }
    }

    /// Whether this movement is a credit-sale settlement.
    pub fn is_settlement(&self) -> bool {
        matches!(self, MovementSource::Settlement { .. })
    }
}

// =============================================================================
// Movement
// =============================================================================

/// One income or expense entry recorded against a session.
///
/// Owned exclusively by its session; never reassigned, never mutated after
/// append. Deletion is the only supported correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Movement {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Date key of the owning session.
    #[ts(as = "String")]
    pub session_date: NaiveDate,

    /// Insertion order within the session. Significant for display only;
    /// totals are order-independent folds.
    pub position: i64,

    /// Income or expense.
    pub kind: MovementKind,

    /// How the money moved.
    pub method: PaymentMethod,

    /// Always positive; the kind carries the sign.
    pub amount_cents: i64,

    /// Free-text label shown in the ledger table.
    pub label: Option<String>,

    /// Originating operation.
    pub source: MovementSource,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Profit carried by this movement (zero unless it came from a sale).
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.source.profit_cents())
    }
}

// =============================================================================
// Cash Session
// =============================================================================

/// The single cash register period for one calendar date.
///
/// ## Cached Accumulators
/// `income_cents`, `expense_cents` and `profit_cents` are caches over the
/// movement list, updated in the same transaction as every append/remove.
/// They are never authoritative: the raw movement list re-derives them,
/// and the session manager repairs any drift it finds on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashSession {
    /// Calendar date, the identity of the session. One per date.
    #[ts(as = "String")]
    pub date: NaiveDate,

    pub status: SessionStatus,

    /// Cash in the drawer when the session was opened.
    pub opening_cents: i64,

    /// Cached: sum of income movement amounts.
    pub income_cents: i64,

    /// Cached: sum of expense movement amounts.
    pub expense_cents: i64,

    /// Cached: sum of movement profits.
    pub profit_cents: i64,

    /// Counted drawer cash, written exactly once at close.
    pub counted_cents: Option<i64>,

    /// counted − expected, written exactly once at close.
    pub difference_cents: Option<i64>,

    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,

    /// Optimistic concurrency version; bumped on every mutation.
    pub version: i64,
}

impl CashSession {
    #[inline]
    pub fn opening(&self) -> Money {
        Money::from_cents(self.opening_cents)
    }

    #[inline]
    pub fn income(&self) -> Money {
        Money::from_cents(self.income_cents)
    }

    #[inline]
    pub fn expense(&self) -> Money {
        Money::from_cents(self.expense_cents)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}

// =============================================================================
// Credit Sale
// =============================================================================

/// A sale handed over now and paid later, possibly in several payments.
///
/// Lives in the subledger, independent of the daily cash ledger until its
/// balance reaches zero. Survives settlement (the `paid` flag flips) and
/// survives deletion of the customer record elsewhere in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CreditSale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer name as entered at the counter. The subledger does not own
    /// customer identity; this is a plain label.
    pub customer: String,

    pub total_cents: i64,

    /// Flips to true when the balance reaches exactly zero.
    pub paid: bool,

    /// Payment method of the settling payment; chosen at settlement,
    /// absent until then.
    pub method: Option<PaymentMethod>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub settled_at: Option<DateTime<Utc>>,

    /// Optimistic concurrency version; bumped on every mutation.
    pub version: i64,
}

impl CreditSale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Remaining balance given this sale's payments.
    ///
    /// Invariant: never negative after any sequence of accepted payments;
    /// the overpayment guard rejects anything that would cross zero.
    pub fn balance_with(&self, payments: &[CreditPayment]) -> Money {
        let paid: Money = payments.iter().map(CreditPayment::amount).sum();
        self.total() - paid
    }
}

/// A line item of a credit sale, with product details snapshotted at the
/// time of sale so later catalog edits don't rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CreditLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub name_snapshot: String,

    /// Sold quantity in thousandths of `unit`.
    pub quantity_milli: i64,
    pub unit: Unit,

    /// Price per `unit` at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Cost per `unit` at time of sale (frozen).
    pub cost_cents: i64,

    /// Line total after unit conversion.
    pub line_total_cents: i64,
}

impl CreditLine {
    /// The sold quantity as a typed value.
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::new(self.quantity_milli, self.unit)
    }
}

/// One payment applied against a credit sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CreditPayment {
    pub id: String,
    pub sale_id: String,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CreditPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, as far as the accounting core is concerned: prices
/// and a stock level. The rest of the catalog (descriptions, images,
/// suppliers) belongs to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    /// Sell price per `stock_unit`.
    pub price_cents: i64,

    /// Cost price per `stock_unit` (for profit tracking).
    pub cost_cents: i64,

    /// Stock level in thousandths of the BASE unit of `stock_unit`'s class.
    /// Kept canonical so deduction is exact integer math.
    pub stock_base_milli: i64,

    /// Display unit the stock was entered in (e.g. Kilogram).
    pub stock_unit: Unit,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Optimistic concurrency version; bumped on every mutation.
    pub version: i64,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Current stock as a canonical base quantity.
    #[inline]
    pub fn stock(&self) -> BaseQuantity {
        BaseQuantity::of_base(self.stock_base_milli, self.stock_unit)
    }

    /// Current stock re-expressed in the display unit where exact.
    #[inline]
    pub fn display_stock(&self) -> Quantity {
        self.stock().display_in(self.stock_unit)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(total_cents: i64) -> CreditSale {
        CreditSale {
            id: "sale-1".to_string(),
            customer: "Ana".to_string(),
            total_cents,
            paid: false,
            method: None,
            created_at: Utc::now(),
            settled_at: None,
            version: 0,
        }
    }

    fn payment(cents: i64) -> CreditPayment {
        CreditPayment {
            id: format!("pay-{cents}"),
            sale_id: "sale-1".to_string(),
            amount_cents: cents,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_balance_with_payments() {
        let s = sale(100_000);
        assert_eq!(s.balance_with(&[]).cents(), 100_000);
        assert_eq!(s.balance_with(&[payment(40_000)]).cents(), 60_000);
        assert_eq!(
            s.balance_with(&[payment(40_000), payment(60_000)]).cents(),
            0
        );
    }

    #[test]
    fn test_movement_source_profit() {
        let manual = MovementSource::Manual;
        assert_eq!(manual.profit_cents(), 0);
        assert!(!manual.is_settlement());

        let sale = MovementSource::Sale {
            sale_id: "s".to_string(),
            product_id: "p".to_string(),
            profit_cents: 250,
        };
        assert_eq!(sale.profit_cents(), 250);

        let settlement = MovementSource::Settlement {
            sale_id: "s".to_string(),
        };
        assert!(settlement.is_settlement());
        assert_eq!(settlement.profit_cents(), 0);
    }

    #[test]
    fn test_movement_source_json_shape_is_stable() {
        // Persisted shape: tagged JSON. Backup/restore depends on this.
        let source = MovementSource::Settlement {
            sale_id: "sale-7".to_string(),
        };
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, r#"{"type":"settlement","sale_id":"sale-7"}"#);

        let back: MovementSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, source);
    }

    #[test]
    fn test_product_stock_views() {
        let p = Product {
            id: "prod-1".to_string(),
            name: "Rice".to_string(),
            price_cents: 400,
            cost_cents: 250,
            stock_base_milli: 5_000_000, // 5000 g
            stock_unit: Unit::Kilogram,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        };
        assert_eq!(p.stock().milli(), 5_000_000);
        assert_eq!(p.display_stock().to_string(), "5 kg");
    }
}
