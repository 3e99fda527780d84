//! Alert events produced by the movement detector.
//!
//! Alerts are ephemeral: created during one cycle, handed to the
//! notification sink, and discarded. They are never persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::entry::PriceEntry;
use super::id::ProductId;
use super::money::Price;

/// Why an alert was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertReason {
    PriceDrop,
    PriceRise,
    QuantityChange,
    NewListing,
}

impl AlertReason {
    /// Stable wire/display code for this reason.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PriceDrop => "PRICE_DROP",
            Self::PriceRise => "PRICE_RISE",
            Self::QuantityChange => "QUANTITY_CHANGE",
            Self::NewListing => "NEW_LISTING",
        }
    }
}

impl std::fmt::Display for AlertReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A significant movement on one product's visible market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceAlert {
    pub product_id: ProductId,
    pub reason: AlertReason,
    /// Absent for [`AlertReason::NewListing`].
    pub previous_price: Option<Price>,
    pub new_price: Price,
    pub currency: String,
    /// `new_price - previous_price`; absent when there is no previous.
    pub delta: Option<Price>,
    /// `delta / previous_price`; absent when there is no previous.
    pub relative_delta: Option<Decimal>,
    /// Carried only by [`AlertReason::QuantityChange`].
    pub previous_quantity: Option<u32>,
    pub new_quantity: u32,
    /// Variant of the comparison entry that triggered the alert.
    pub language: String,
    pub condition: String,
    pub observed_at: DateTime<Utc>,
}

impl PriceAlert {
    /// First observation of a `(language, condition)` group.
    #[must_use]
    pub fn new_listing(entry: &PriceEntry) -> Self {
        Self {
            product_id: entry.product_id().clone(),
            reason: AlertReason::NewListing,
            previous_price: None,
            new_price: entry.price(),
            currency: entry.currency().to_string(),
            delta: None,
            relative_delta: None,
            previous_quantity: None,
            new_quantity: entry.quantity(),
            language: entry.language().to_string(),
            condition: entry.condition().to_string(),
            observed_at: entry.observed_at(),
        }
    }

    /// Price movement past a threshold, in either direction.
    #[must_use]
    pub fn price_movement(
        reason: AlertReason,
        previous: &PriceEntry,
        comparison: &PriceEntry,
        delta: Price,
        relative_delta: Decimal,
    ) -> Self {
        Self {
            product_id: comparison.product_id().clone(),
            reason,
            previous_price: Some(previous.price()),
            new_price: comparison.price(),
            currency: comparison.currency().to_string(),
            delta: Some(delta),
            relative_delta: Some(relative_delta),
            previous_quantity: None,
            new_quantity: comparison.quantity(),
            language: comparison.language().to_string(),
            condition: comparison.condition().to_string(),
            observed_at: comparison.observed_at(),
        }
    }

    /// Availability changed between observations.
    #[must_use]
    pub fn quantity_change(previous: &PriceEntry, comparison: &PriceEntry) -> Self {
        Self {
            product_id: comparison.product_id().clone(),
            reason: AlertReason::QuantityChange,
            previous_price: Some(previous.price()),
            new_price: comparison.price(),
            currency: comparison.currency().to_string(),
            delta: None,
            relative_delta: None,
            previous_quantity: Some(previous.quantity()),
            new_quantity: comparison.quantity(),
            language: comparison.language().to_string(),
            condition: comparison.condition().to_string(),
            observed_at: comparison.observed_at(),
        }
    }
}
