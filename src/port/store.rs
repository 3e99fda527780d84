//! Persistence port for the append-only observation history.

use std::future::Future;

use crate::domain::{FilterCriteria, PriceEntry, ProductId};
use crate::error::StoreError;

/// Append-only per-product observation log.
///
/// Entries are never mutated or deleted. Callers append in observation
/// order; the store preserves insertion order and must serialize
/// concurrent appends to the same product without reordering them. A
/// failed append must not corrupt previously recorded entries.
pub trait HistoryStore: Send + Sync {
    /// Durably record one observation.
    fn append(
        &self,
        entry: &PriceEntry,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The most recently appended entry for `product` matching `filter`,
    /// or `None` when no such history exists yet.
    fn latest(
        &self,
        product: &ProductId,
        filter: &FilterCriteria,
    ) -> impl Future<Output = Result<Option<PriceEntry>, StoreError>> + Send;

    /// All entries for `product` in insertion order. Finite, and
    /// restartable by calling again.
    fn history(
        &self,
        product: &ProductId,
    ) -> impl Future<Output = Result<Vec<PriceEntry>, StoreError>> + Send;
}
