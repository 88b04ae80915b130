//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Business-rule violations                       │
//! │  │   ├── SessionState   - wrong session lifecycle state                │
//! │  │   ├── InsufficientStock - deduction would go negative               │
//! │  │   ├── Overpayment    - payment exceeds remaining balance            │
//! │  │   └── Validation     - wraps ValidationError                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                        │
//! │  till-db errors (separate crate)                                       │
//! │  └── StoreError       - Persistence failures, wraps CoreError          │
//! │                                                                        │
//! │  Flow: ValidationError → CoreError → StoreError → dashboard           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity id, attempted amount,
//!    current balance/stock) so the dashboard can render a usable message
//! 3. Errors are enum variants, never String
//! 4. Business-rule errors are raised BEFORE any mutation

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;
use crate::units::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Core accounting errors.
///
/// These errors represent business rule violations. They are detected before
/// any state change, so a failed operation never leaves partial effects.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cash session for a date is not in the state an operation needs.
    ///
    /// ## When This Occurs
    /// - Appending or removing a movement on a Closed session
    /// - Closing a date with no Open session (including double-close)
    /// - Recording a sale when no session exists for the date
    ///
    /// ## Caller Contract
    /// `found = "absent"` means the caller should prompt the user to open
    /// a session; the core never opens one implicitly.
    #[error("cash session for {date} is {found}, cannot {operation}")]
    SessionState {
        date: NaiveDate,
        /// Lifecycle state actually found: "absent", "open" or "closed".
        found: &'static str,
        operation: String,
    },

    /// Stock deduction would make stock negative.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (2.5 kg)
    ///      │
    ///      ▼
    /// Check stock: available = 1.2 kg
    ///      │
    ///      ▼
    /// InsufficientStock { available: 1.2 kg, requested: 2.5 kg }
    ///      │
    ///      ▼
    /// UI shows: "Only 1.2 kg in stock"
    /// ```
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Payment exceeds the remaining balance of a credit sale.
    ///
    /// Rejected outright: no partial application of the payment.
    #[error("payment of {attempted} exceeds remaining balance {balance} on credit sale {sale_id}")]
    Overpayment {
        sale_id: String,
        balance: Money,
        attempted: Money,
    },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a SessionState error.
    pub fn session_state(
        date: NaiveDate,
        found: &'static str,
        operation: impl Into<String>,
    ) -> Self {
        CoreError::SessionState {
            date,
            found,
            operation: operation.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., unparseable unit code or movement source).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two quantities belong to different measurement classes.
    ///
    /// Deducting liters from a stock kept in grams is always a caller bug.
    #[error("cannot combine {left} with {right}: unit classes differ")]
    IncompatibleUnits { left: String, right: String },

    /// Duplicate value (e.g., a second session for the same date).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_session_state_message() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let err = CoreError::session_state(date, "closed", "append movement");
        assert_eq!(
            err.to_string(),
            "cash session for 2026-03-14 is closed, cannot append movement"
        );
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            product_id: "prod-1".to_string(),
            available: Quantity::new(1200, Unit::Kilogram),
            requested: Quantity::new(2500, Unit::Kilogram),
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product prod-1: available 1.2 kg, requested 2.5 kg"
        );
    }

    #[test]
    fn test_overpayment_message() {
        let err = CoreError::Overpayment {
            sale_id: "sale-9".to_string(),
            balance: Money::from_cents(60_000),
            attempted: Money::from_cents(70_000),
        };
        assert_eq!(
            err.to_string(),
            "payment of $700.00 exceeds remaining balance $600.00 on credit sale sale-9"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
