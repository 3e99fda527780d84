//! Fetch capability consumed by the pricing service.

use std::future::Future;

use crate::domain::{ObservationBatch, WatchItem};
use crate::error::FetchError;

/// Produces the current listing snapshots for a watch item.
///
/// The wire protocol behind this is deliberately unspecified; the core
/// only requires that an error be distinguishable from a successful empty
/// batch. Bounding a hung request (timeouts) is the implementor's
/// responsibility - a timeout surfaces as an ordinary [`FetchError`].
pub trait SnapshotFetcher: Send + Sync {
    /// Fetch zero or more current listings matching the item's criteria.
    fn fetch(
        &self,
        item: &WatchItem,
    ) -> impl Future<Output = Result<ObservationBatch, FetchError>> + Send;
}
