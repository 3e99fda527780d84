//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate
//! inputs before a value enters the history pipeline.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Observed prices must be strictly positive; the detector divides
    /// by the previous price when computing relative deltas.
    #[error("price must be positive, got {price}")]
    NonPositivePrice {
        /// The invalid price that was provided.
        price: rust_decimal::Decimal,
    },

    /// Product identifiers cannot be empty.
    #[error("product id cannot be empty")]
    EmptyProductId,

    /// Currency tags cannot be empty.
    #[error("currency cannot be empty")]
    EmptyCurrency,
}
