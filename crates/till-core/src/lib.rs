//! # till-core: Pure Accounting Logic for Till
//!
//! This crate is the **heart** of Till. It contains the daily cash ledger
//! and credit subledger logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Dashboard (out of scope)                      │   │
//! │  │   Catalog UI ──► Sale entry ──► Register UI ──► Credit UI      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (storage layer)                      │   │
//! │  │   session/credit/product repositories, transactions, events    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   units   │  │  ledger   │  │   │
//! │  │   │  Session  │  │   Money   │  │ Quantity  │  │  folds +  │  │   │
//! │  │   │ Movement  │  │  (cents)  │  │  deduct   │  │  guards   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ reconcile │  │ validation│                                 │   │
//! │  │   │ CashCount │  │   rules   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CashSession, Movement, CreditSale, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`units`] - Unit conversion and stock deduction
//! - [`ledger`] - Session state machine and aggregate folds
//! - [`reconcile`] - Expected-vs-counted cash at close
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output. Dates and ids come in as parameters, never from ambient
//!    wall-clock state.
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64); all
//!    quantities are integer thousandths of a unit
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Cache, never authority**: every cached aggregate is re-derivable
//!    from the raw movement/payment list
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use till_core::money::Money;
//! use till_core::types::CashSession;
//!
//! let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
//! let mut session = CashSession::open(date, Money::from_cents(100_000), Utc::now()).unwrap();
//!
//! // Close against a counted drawer of $1000.00: balanced
//! let count = session.close(&[], Money::from_cents(100_000), Utc::now()).unwrap();
//! assert!(count.is_balanced());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reconcile::CashCount;
pub use types::*;
pub use units::{BaseQuantity, Quantity, Unit, UnitClass};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a customer name on a credit sale.
///
/// ## Business Reason
/// The customer field is a free-text label typed at the counter; the cap
/// keeps pasted garbage out of the subledger.
pub const MAX_CUSTOMER_NAME_LEN: usize = 120;

/// Maximum length of a movement label.
pub const MAX_LABEL_LEN: usize = 200;
