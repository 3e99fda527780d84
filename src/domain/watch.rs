//! Watch list types: tracked products and their filter criteria.

use super::entry::PriceEntry;
use super::id::ProductId;

/// Criteria used to narrow a product's visible market.
///
/// `None` for language or condition means "any". The minimum quantity is
/// floored at 1: a listing with nothing available is never interesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    language: Option<String>,
    condition: Option<String>,
    min_quantity: u32,
}

impl FilterCriteria {
    pub fn new(
        language: Option<String>,
        condition: Option<String>,
        min_quantity: u32,
    ) -> Self {
        Self {
            language,
            condition,
            min_quantity: min_quantity.max(1),
        }
    }

    /// Match anything with at least one copy available.
    #[must_use]
    pub fn any() -> Self {
        Self::new(None, None, 1)
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    #[must_use]
    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    /// True when `entry` satisfies every configured criterion.
    #[must_use]
    pub fn matches(&self, entry: &PriceEntry) -> bool {
        if let Some(language) = &self.language {
            if entry.language() != language {
                return false;
            }
        }
        if let Some(condition) = &self.condition {
            if entry.condition() != condition {
                return false;
            }
        }
        entry.quantity() >= self.min_quantity
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::any()
    }
}

/// A product tracked by the application.
///
/// Owned by the watchlist provider; the core treats it as immutable input
/// for one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchItem {
    product_id: ProductId,
    product_name: String,
    filter: FilterCriteria,
}

impl WatchItem {
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        filter: FilterCriteria,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            filter,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    #[must_use]
    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::ListingId;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn entry(language: &str, condition: &str, quantity: u32) -> PriceEntry {
        PriceEntry::try_new(
            ProductId::from("prod-1"),
            Utc::now(),
            language,
            condition,
            dec!(5.00),
            "EUR",
            quantity,
            Some(ListingId::from("L1")),
        )
        .unwrap()
    }

    #[test]
    fn min_quantity_is_floored_at_one() {
        let filter = FilterCriteria::new(None, None, 0);
        assert_eq!(filter.min_quantity(), 1);
    }

    #[test]
    fn matches_on_language_condition_and_quantity() {
        let filter = FilterCriteria::new(Some("EN".into()), Some("NM".into()), 2);
        assert!(filter.matches(&entry("EN", "NM", 2)));
        assert!(!filter.matches(&entry("DE", "NM", 2)));
        assert!(!filter.matches(&entry("EN", "LP", 2)));
        assert!(!filter.matches(&entry("EN", "NM", 1)));
    }

    #[test]
    fn open_filter_matches_any_variant() {
        let filter = FilterCriteria::any();
        assert!(filter.matches(&entry("JP", "PO", 1)));
    }
}
