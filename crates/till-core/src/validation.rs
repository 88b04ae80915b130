//! # Validation Module
//!
//! Input validation for ledger and subledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms (TypeScript)                                 │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - before any mutation                            │
//! │  ├── Amount sign rules                                                 │
//! │  └── Field presence/length rules                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on amounts                                      │
//! │  ├── PRIMARY KEY on session date                                       │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  A rejected operation must leave NO partial state change, so every    │
//! │  rule here runs before the first write of its operation.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CUSTOMER_NAME_LEN, MAX_LABEL_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a session opening amount.
///
/// ## Rules
/// - Must be zero or greater (an empty drawer is a valid start)
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_opening_amount;
///
/// assert!(validate_opening_amount(0).is_ok());
/// assert!(validate_opening_amount(100_000).is_ok());
/// assert!(validate_opening_amount(-1).is_err());
/// ```
pub fn validate_opening_amount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "opening amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a movement amount.
///
/// ## Rules
/// - Must be strictly positive; the movement kind carries the sign
pub fn validate_movement_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "movement amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a credit payment amount.
///
/// ## Rules
/// - Must be strictly positive; zero payments are noise, negative ones
///   would be refunds, which the subledger does not model
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name on a credit sale.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_CUSTOMER_NAME_LEN` characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer".to_string(),
        });
    }

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional movement label.
///
/// ## Rules
/// - Empty/whitespace labels collapse to None
/// - At most `MAX_LABEL_LEN` characters
pub fn validate_label(label: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(label) = label else { return Ok(None) };
    let label = label.trim();

    if label.is_empty() {
        return Ok(None);
    }

    if label.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: MAX_LABEL_LEN,
        });
    }

    Ok(Some(label.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_opening_amount() {
        assert!(validate_opening_amount(0).is_ok());
        assert!(validate_opening_amount(100_000).is_ok());
        assert!(validate_opening_amount(-1).is_err());
    }

    #[test]
    fn test_validate_movement_amount() {
        assert!(validate_movement_amount(1).is_ok());
        assert!(validate_movement_amount(0).is_err());
        assert!(validate_movement_amount(-500).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(40_000).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-1).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("  Ana  ").unwrap(), "Ana");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert_eq!(validate_label(None).unwrap(), None);
        assert_eq!(validate_label(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_label(Some(" ice delivery ")).unwrap(),
            Some("ice delivery".to_string())
        );
        assert!(validate_label(Some(&"x".repeat(300))).is_err());
    }
}
