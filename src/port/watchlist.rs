//! Watchlist port: the list-of-criteria provider.

use crate::domain::WatchItem;

/// Read access to the tracked products.
///
/// The pricing service takes one snapshot at the start of each cycle and
/// does not observe mutations mid-cycle. CRUD storage for the list itself
/// is an external concern.
pub trait WatchlistProvider: Send + Sync {
    /// Snapshot of all currently watched items.
    fn list(&self) -> Vec<WatchItem>;
}
