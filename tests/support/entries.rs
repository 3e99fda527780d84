use cardwatch::domain::{ListingId, PriceEntry, ProductId};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

/// Build a valid entry with a deterministic timestamp derived from `seq`.
pub fn entry(
    product: &str,
    seq: i64,
    price: Decimal,
    quantity: u32,
    language: &str,
    condition: &str,
    listing: Option<&str>,
) -> PriceEntry {
    PriceEntry::try_new(
        ProductId::from(product),
        Utc.timestamp_opt(1_750_000_000 + seq, 0).unwrap(),
        language,
        condition,
        price,
        "EUR",
        quantity,
        listing.map(ListingId::from),
    )
    .expect("valid test entry")
}
