//! # Unit Conversion Module
//!
//! Normalizes quantities across measurement units and performs stock
//! deduction checks. This is the single conversion table in the system:
//! stock math and weight-priced billing both go through it, so the two can
//! never drift apart by rounding differently.
//!
//! ## Canonical Bases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Measurement Classes                               │
//! │                                                                         │
//! │   Class     Base unit      Non-base units                              │
//! │   ───────   ────────────   ──────────────────────                      │
//! │   Mass      gram (g)       kilogram (kg)  ×1000                        │
//! │   Volume    milliliter     liter (l)      ×1000                        │
//! │   Count     piece (pc)     —                                           │
//! │                                                                         │
//! │   Internal resolution: thousandths of the base unit ("base milli").    │
//! │   2.5 kg → 2500 milli-kg → 2 500 000 milli-g → back → 2.5 kg exactly.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Integer Thousandths?
//! Same reasoning as integer cents in [`crate::money`]: a deduction of
//! 2.5 kg from a 5 kg stock must leave exactly 2.5 kg, not 2.4999999 kg.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Unit & UnitClass
// =============================================================================

/// Measurement class of a unit. Quantities can only be compared or combined
/// within one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Mass,
    Volume,
    Count,
}

/// A measurement unit accepted by the catalog and sale entry forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
}

impl Unit {
    /// Returns the measurement class this unit belongs to.
    pub const fn class(&self) -> UnitClass {
        match self {
            Unit::Gram | Unit::Kilogram => UnitClass::Mass,
            Unit::Milliliter | Unit::Liter => UnitClass::Volume,
            Unit::Piece => UnitClass::Count,
        }
    }

    /// Returns the canonical base unit of this unit's class.
    pub const fn base(&self) -> Unit {
        match self.class() {
            UnitClass::Mass => Unit::Gram,
            UnitClass::Volume => Unit::Milliliter,
            UnitClass::Count => Unit::Piece,
        }
    }

    /// Fixed multiplicative factor to the base unit (base units per 1 of
    /// this unit).
    pub const fn factor(&self) -> i64 {
        match self {
            Unit::Kilogram | Unit::Liter => 1000,
            Unit::Gram | Unit::Milliliter | Unit::Piece => 1,
        }
    }

    /// Whether this unit is its class's base unit.
    pub const fn is_base(&self) -> bool {
        self.factor() == 1
    }

    /// Short display symbol.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Piece => "pc",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// A quantity expressed in thousandths ("milli") of a given unit.
///
/// ## Example
/// ```rust
/// use till_core::units::{Quantity, Unit};
///
/// let q = Quantity::new(2500, Unit::Kilogram); // 2.5 kg
/// assert_eq!(q.to_string(), "2.5 kg");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity {
    /// Thousandths of `unit`. 2500 with Kilogram = 2.5 kg.
    milli: i64,
    unit: Unit,
}

impl Quantity {
    /// Creates a quantity from thousandths of the given unit.
    #[inline]
    pub const fn new(milli: i64, unit: Unit) -> Self {
        Quantity { milli, unit }
    }

    /// Creates a whole-number quantity (e.g. 3 pieces, 500 grams).
    #[inline]
    pub const fn from_whole(amount: i64, unit: Unit) -> Self {
        Quantity {
            milli: amount * 1000,
            unit,
        }
    }

    /// Thousandths of this quantity's unit.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.milli
    }

    /// The unit this quantity is expressed in.
    #[inline]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.milli == 0
    }

    /// Converts to the canonical base unit of this quantity's class.
    ///
    /// Pure, constant-time, exact: the factor is a fixed integer.
    #[inline]
    pub fn to_base(&self) -> BaseQuantity {
        BaseQuantity {
            milli: self.milli * self.unit.factor(),
            unit: self.unit.base(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.milli as f64 / 1000.0, self.unit)
    }
}

// =============================================================================
// BaseQuantity
// =============================================================================

/// A quantity normalized to thousandths of its class's base unit.
///
/// Stock levels are stored in this form, so deduction is a plain integer
/// subtraction regardless of which unit the sale was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BaseQuantity {
    milli: i64,
    unit: Unit,
}

impl BaseQuantity {
    /// Creates a base quantity from thousandths of a base unit.
    ///
    /// Returns a validation error if `unit` is not a base unit.
    pub fn new(milli: i64, unit: Unit) -> CoreResult<Self> {
        if !unit.is_base() {
            return Err(ValidationError::InvalidFormat {
                field: "unit".to_string(),
                reason: format!("{unit} is not a base unit"),
            }
            .into());
        }
        Ok(BaseQuantity { milli, unit })
    }

    /// Creates a base quantity in the base unit of `unit`'s class.
    ///
    /// Infallible form used when rehydrating stored stock levels, which are
    /// always persisted in base milli.
    #[inline]
    pub const fn of_base(milli: i64, unit: Unit) -> Self {
        BaseQuantity {
            milli,
            unit: unit.base(),
        }
    }

    /// Thousandths of the base unit.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.milli
    }

    /// The base unit (gram, milliliter or piece).
    #[inline]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.milli == 0
    }

    /// Re-expresses this quantity in the given unit of the same class.
    ///
    /// Fails with `IncompatibleUnits` across classes, or `InvalidFormat`
    /// when the value does not divide evenly into the target unit (the
    /// stock resolution is thousandths of the base unit; callers that need
    /// a guaranteed representation use [`BaseQuantity::as_quantity`]).
    ///
    /// ## Round-Trip Identity
    /// ```rust
    /// use till_core::units::{Quantity, Unit};
    ///
    /// let q = Quantity::new(2500, Unit::Kilogram); // 2.5 kg
    /// let base = q.to_base();                      // 2 500 000 milli-g
    /// assert_eq!(base.in_unit(Unit::Kilogram).unwrap(), q);
    /// ```
    pub fn in_unit(&self, unit: Unit) -> CoreResult<Quantity> {
        if unit.class() != self.unit.class() {
            return Err(ValidationError::IncompatibleUnits {
                left: self.unit.to_string(),
                right: unit.to_string(),
            }
            .into());
        }

        let factor = unit.factor();
        if self.milli % factor != 0 {
            return Err(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: format!("{} does not divide evenly into {unit}", self.as_quantity()),
            }
            .into());
        }

        Ok(Quantity::new(self.milli / factor, unit))
    }

    /// This quantity expressed in its base unit. Always exact.
    #[inline]
    pub const fn as_quantity(&self) -> Quantity {
        Quantity::new(self.milli, self.unit)
    }

    /// Best display form: the requested unit when exact, base unit otherwise.
    pub fn display_in(&self, unit: Unit) -> Quantity {
        self.in_unit(unit).unwrap_or_else(|_| self.as_quantity())
    }
}

impl fmt::Display for BaseQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_quantity().fmt(f)
    }
}

// =============================================================================
// Stock Deduction
// =============================================================================

/// Deducts a sold quantity from a stock level, all-or-nothing.
///
/// ## Behavior
/// - Cross-class deduction (liters from grams) → `IncompatibleUnits`
/// - Non-positive sold quantity → `MustBePositive`
/// - Sold exceeds stock → `InsufficientStock`, stock untouched
/// - Otherwise returns the new stock level; the caller persists it and
///   re-expresses it in the product's display unit
///
/// ## Example
/// ```rust
/// use till_core::units::{deduct, BaseQuantity, Quantity, Unit};
///
/// let stock = BaseQuantity::new(5_000_000, Unit::Gram).unwrap(); // 5000 g
/// let sold = Quantity::new(2500, Unit::Kilogram);                // 2.5 kg
///
/// let remaining = deduct("prod-1", stock, sold).unwrap();
/// assert_eq!(remaining.in_unit(Unit::Kilogram).unwrap().to_string(), "2.5 kg");
/// ```
pub fn deduct(product_id: &str, stock: BaseQuantity, sold: Quantity) -> CoreResult<BaseQuantity> {
    if sold.unit().class() != stock.unit().class() {
        return Err(ValidationError::IncompatibleUnits {
            left: stock.unit().to_string(),
            right: sold.unit().to_string(),
        }
        .into());
    }

    if sold.milli() <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    let sold_base = sold.to_base();
    if sold_base.milli() > stock.milli() {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available: stock.display_in(sold.unit()),
            requested: sold,
        });
    }

    // Exact: both sides are in base milli, no rounding anywhere.
    Ok(BaseQuantity {
        milli: stock.milli() - sold_base.milli(),
        unit: stock.unit(),
    })
}

// =============================================================================
// Weight-Priced Billing
// =============================================================================

/// Computes a line total for goods priced per unit (e.g. per kilogram).
///
/// Uses the same conversion table as stock deduction so billing and stock
/// can never round apart. Half-up integer rounding on the final cent.
///
/// ## Example
/// ```rust
/// use till_core::money::Money;
/// use till_core::units::{extended_price, Quantity, Unit};
///
/// // $4.00 per kg, selling 2.5 kg = $10.00
/// let total = extended_price(Money::from_cents(400), Unit::Kilogram,
///                            Quantity::new(2500, Unit::Kilogram)).unwrap();
/// assert_eq!(total.cents(), 1000);
/// ```
pub fn extended_price(unit_price: Money, priced_unit: Unit, qty: Quantity) -> CoreResult<Money> {
    if qty.unit().class() != priced_unit.class() {
        return Err(ValidationError::IncompatibleUnits {
            left: priced_unit.to_string(),
            right: qty.unit().to_string(),
        }
        .into());
    }

    let base = qty.to_base();

    // total = price × (base milli / (priced factor × 1000)), rounded half-up.
    // i128 to prevent overflow on large amounts.
    let denom = priced_unit.factor() as i128 * 1000;
    let cents = (unit_price.cents() as i128 * base.milli() as i128 + denom / 2) / denom;

    Ok(Money::from_cents(cents as i64))
}

// =============================================================================
// Unit Tests
// =============================================================================
