//! Price observations - the unit of persistence.

use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::id::{ListingId, ProductId};
use super::money::Price;

/// One observed listing at a point in time.
///
/// Immutable once created. Constructed through [`PriceEntry::try_new`],
/// which enforces a strictly positive price; a zero available quantity is
/// representable (a listing can sell out between fetch and parse) but such
/// entries are treated as invalid by the movement detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceEntry {
    product_id: ProductId,
    observed_at: DateTime<Utc>,
    language: String,
    condition: String,
    price: Price,
    currency: String,
    quantity: u32,
    listing_id: Option<ListingId>,
}

/// The set of entries returned by one fetch for one watch item in one
/// cycle. May be empty when no listings match.
pub type ObservationBatch = Vec<PriceEntry>;

impl PriceEntry {
    /// Create a validated price entry.
    ///
    /// # Errors
    /// Returns [`DomainError`] when the product id or currency is empty or
    /// the price is not strictly positive.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        product_id: ProductId,
        observed_at: DateTime<Utc>,
        language: impl Into<String>,
        condition: impl Into<String>,
        price: Price,
        currency: impl Into<String>,
        quantity: u32,
        listing_id: Option<ListingId>,
    ) -> Result<Self, DomainError> {
        if product_id.as_str().is_empty() {
            return Err(DomainError::EmptyProductId);
        }
        let currency = currency.into();
        if currency.is_empty() {
            return Err(DomainError::EmptyCurrency);
        }
        if price <= Price::ZERO {
            return Err(DomainError::NonPositivePrice { price });
        }

        Ok(Self {
            product_id,
            observed_at,
            language: language.into(),
            condition: condition.into(),
            price,
            currency,
            quantity,
            listing_id,
        })
    }

    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn listing_id(&self) -> Option<&ListingId> {
        self.listing_id.as_ref()
    }

    /// The `(language, condition)` grouping key used for comparison.
    #[must_use]
    pub fn variant(&self) -> (&str, &str) {
        (&self.language, &self.condition)
    }
}
