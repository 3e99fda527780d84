//! Monetary types for price representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Currency tag attached to observed prices.
///
/// The marketplace quotes everything in a single currency per deployment,
/// so a plain tag string is carried through to storage and export.
pub const DEFAULT_CURRENCY: &str = "EUR";
