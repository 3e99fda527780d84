//! Movement detection over price observations.
//!
//! [`detect`] is a pure function from (previous observation, new snapshot
//! batch, thresholds) to zero or more alerts. It performs no I/O and is
//! deterministic for a given input, which is what makes it the one piece
//! of this system worth property-testing exhaustively.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::alert::{AlertReason, PriceAlert};
use super::entry::PriceEntry;

/// Relative movement thresholds for price alerts.
///
/// Both ratios are fractions of the previous price: a `drop_ratio` of
/// `0.10` fires when the price falls by 10% or more.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_drop_ratio")]
    pub drop_ratio: Decimal,

    #[serde(default = "default_rise_ratio")]
    pub rise_ratio: Decimal,
}

fn default_drop_ratio() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

fn default_rise_ratio() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            drop_ratio: default_drop_ratio(),
            rise_ratio: default_rise_ratio(),
        }
    }
}

/// Compare a new snapshot batch against the last recorded observation.
///
/// With no previous observation, every distinct `(language, condition)`
/// group in the batch produces one `NEW_LISTING` alert carrying the
/// group's lowest price. With a previous observation, the lowest-price
/// entry of the same variant becomes the comparison entry; price and
/// quantity movements are then checked independently. An empty visible
/// market (no entry matching the previous variant) is not itself
/// alertable.
///
/// Listings with a non-positive price or zero quantity are excluded as
/// invalid before any comparison.
#[must_use]
pub fn detect(
    previous: Option<&PriceEntry>,
    current: &[PriceEntry],
    thresholds: &Thresholds,
) -> Vec<PriceAlert> {
    let valid: Vec<&PriceEntry> = current.iter().filter(|e| is_valid(e)).collect();

    let Some(previous) = previous else {
        return detect_new_listings(&valid);
    };

    let comparison = valid
        .iter()
        .filter(|e| e.variant() == previous.variant())
        .copied()
        .min_by(|a, b| comparison_key(a).cmp(&comparison_key(b)));

    let Some(comparison) = comparison else {
        return Vec::new();
    };

    let mut alerts = Vec::new();

    let delta = comparison.price() - previous.price();
    // previous.price() > 0 is enforced at entry construction
    let relative = delta / previous.price();

    if relative <= -thresholds.drop_ratio {
        alerts.push(PriceAlert::price_movement(
            AlertReason::PriceDrop,
            previous,
            comparison,
            delta,
            relative,
        ));
    } else if relative >= thresholds.rise_ratio {
        alerts.push(PriceAlert::price_movement(
            AlertReason::PriceRise,
            previous,
            comparison,
            delta,
            relative,
        ));
    }

    if comparison.quantity() != previous.quantity() {
        alerts.push(PriceAlert::quantity_change(previous, comparison));
    }

    alerts
}

fn is_valid(entry: &PriceEntry) -> bool {
    entry.price() > Decimal::ZERO && entry.quantity() > 0
}

/// Lowest price wins; ties break on lowest listing id, with id-less
/// entries ordering after any entry that carries one.
fn comparison_key<'a>(
    entry: &'a PriceEntry,
) -> (Decimal, bool, Option<&'a super::id::ListingId>) {
    (entry.price(), entry.listing_id().is_none(), entry.listing_id())
}

fn detect_new_listings(valid: &[&PriceEntry]) -> Vec<PriceAlert> {
    // BTreeMap keeps group iteration (and therefore alert order) deterministic.
    let mut groups: BTreeMap<(String, String), &PriceEntry> = BTreeMap::new();
    for &entry in valid {
        let key = (entry.language().to_string(), entry.condition().to_string());
        groups
            .entry(key)
            .and_modify(|best| {
                if comparison_key(entry) < comparison_key(best) {
                    *best = entry;
                }
            })
            .or_insert(entry);
    }

    groups
        .values()
        .map(|entry| PriceAlert::new_listing(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{ListingId, ProductId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn entry(
        price: Decimal,
        quantity: u32,
        language: &str,
        condition: &str,
        listing: Option<&str>,
    ) -> PriceEntry {
        PriceEntry::try_new(
            ProductId::from("prod-1"),
            Utc::now(),
            language,
            condition,
            price,
            "EUR",
            quantity,
            listing.map(ListingId::from),
        )
        .unwrap()
    }

    fn thresholds(drop: Decimal, rise: Decimal) -> Thresholds {
        Thresholds {
            drop_ratio: drop,
            rise_ratio: rise,
        }
    }

    #[test]
    fn drop_past_threshold_emits_single_price_drop() {
        // previous 10.00 -> current 8.00 with 10% threshold: -20% move
        let previous = entry(dec!(10.00), 4, "EN", "NM", Some("L0"));
        let current = vec![entry(dec!(8.00), 4, "EN", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.reason, AlertReason::PriceDrop);
        assert_eq!(alert.previous_price, Some(dec!(10.00)));
        assert_eq!(alert.new_price, dec!(8.00));
        assert_eq!(alert.delta, Some(dec!(-2.00)));
        assert_eq!(alert.relative_delta, Some(dec!(-0.2)));
    }

    #[test]
    fn rise_past_threshold_emits_price_rise() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![entry(dec!(11.00), 4, "EN", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].reason, AlertReason::PriceRise);
        assert_eq!(alerts[0].relative_delta, Some(dec!(0.1)));
    }

    #[test]
    fn movement_inside_band_emits_no_price_alert() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![entry(dec!(10.50), 4, "EN", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        assert!(alerts.is_empty());
    }

    #[test]
    fn drop_and_rise_never_fire_together() {
        // Threshold edge: relative delta exactly -drop_ratio fires a drop.
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![entry(dec!(9.00), 4, "EN", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        let reasons: Vec<_> = alerts.iter().map(|a| a.reason).collect();
        assert_eq!(reasons, vec![AlertReason::PriceDrop]);
    }

    #[test]
    fn quantity_change_fires_independently_of_price_band() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![entry(dec!(10.20), 7, "EN", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.reason, AlertReason::QuantityChange);
        assert_eq!(alert.previous_quantity, Some(4));
        assert_eq!(alert.new_quantity, 7);
    }

    #[test]
    fn simultaneous_price_and_quantity_change_fire_both() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![entry(dec!(8.00), 2, "EN", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        let reasons: Vec<_> = alerts.iter().map(|a| a.reason).collect();
        assert_eq!(
            reasons,
            vec![AlertReason::PriceDrop, AlertReason::QuantityChange]
        );
    }

    #[test]
    fn no_previous_emits_one_new_listing_per_variant() {
        let current = vec![
            entry(dec!(5), 1, "EN", "NM", None),
            entry(dec!(6), 2, "DE", "LP", None),
        ];

        let alerts = detect(None, &current, &Thresholds::default());

        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.reason == AlertReason::NewListing));
        assert!(alerts.iter().all(|a| a.previous_price.is_none()));

        // deterministic group order: DE/LP before EN/NM
        assert_eq!((alerts[0].language.as_str(), alerts[0].new_price), ("DE", dec!(6)));
        assert_eq!((alerts[1].language.as_str(), alerts[1].new_price), ("EN", dec!(5)));
    }

    #[test]
    fn new_listing_uses_lowest_price_in_group() {
        let current = vec![
            entry(dec!(7.50), 1, "EN", "NM", Some("L2")),
            entry(dec!(5.25), 1, "EN", "NM", Some("L1")),
            entry(dec!(9.00), 1, "EN", "NM", Some("L3")),
        ];

        let alerts = detect(None, &current, &Thresholds::default());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].new_price, dec!(5.25));
    }

    #[test]
    fn no_previous_and_empty_batch_is_silent() {
        assert!(detect(None, &[], &Thresholds::default()).is_empty());
    }

    #[test]
    fn empty_visible_market_is_not_alertable() {
        // Previous variant EN/NM; batch only carries DE/NM listings.
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![entry(dec!(1.00), 4, "DE", "NM", Some("L1"))];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        assert!(alerts.is_empty());
    }

    #[test]
    fn comparison_picks_lowest_price_matching_variant() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![
            entry(dec!(2.00), 4, "DE", "NM", Some("L1")), // other variant, cheaper
            entry(dec!(9.50), 4, "EN", "NM", Some("L2")),
            entry(dec!(8.00), 4, "EN", "NM", Some("L3")),
        ];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].new_price, dec!(8.00));
    }

    #[test]
    fn price_ties_break_on_lowest_listing_id() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![
            entry(dec!(8.00), 9, "EN", "NM", Some("L2")),
            entry(dec!(8.00), 5, "EN", "NM", Some("L1")),
            entry(dec!(8.00), 7, "EN", "NM", None),
        ];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        // Comparison entry is L1; its quantity drives the quantity alert.
        let quantity_alert = alerts
            .iter()
            .find(|a| a.reason == AlertReason::QuantityChange)
            .unwrap();
        assert_eq!(quantity_alert.new_quantity, 5);
    }

    #[test]
    fn sold_out_listings_are_excluded_from_comparison() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![
            entry(dec!(1.00), 0, "EN", "NM", Some("L1")), // sold out, invalid
            entry(dec!(9.80), 4, "EN", "NM", Some("L2")),
        ];

        let alerts = detect(
            Some(&previous),
            &current,
            &thresholds(dec!(0.1), dec!(0.1)),
        );

        // 9.80 is within the band, so the invalid 1.00 listing must not fire.
        assert!(alerts.is_empty());
    }

    #[test]
    fn detect_is_deterministic() {
        let previous = entry(dec!(10.00), 4, "EN", "NM", None);
        let current = vec![
            entry(dec!(8.00), 5, "EN", "NM", Some("L2")),
            entry(dec!(8.00), 5, "EN", "NM", Some("L1")),
        ];
        let t = thresholds(dec!(0.1), dec!(0.1));

        let first = detect(Some(&previous), &current, &t);
        let second = detect(Some(&previous), &current, &t);
        assert_eq!(first, second);
    }
}
