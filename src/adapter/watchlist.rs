//! In-memory watchlist provider seeded from configuration.

use parking_lot::RwLock;

use crate::config::WatchEntryConfig;
use crate::domain::{FilterCriteria, ProductId, WatchItem};
use crate::port::WatchlistProvider;

/// Watchlist held in memory behind a read-write lock.
///
/// The pricing service snapshots it at the start of each cycle; the list
/// can be replaced between cycles without interrupting the schedule.
#[derive(Default)]
pub struct InMemoryWatchlist {
    items: RwLock<Vec<WatchItem>>,
}

impl InMemoryWatchlist {
    #[must_use]
    pub fn new(items: Vec<WatchItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Build the watchlist from `[[watchlist]]` config entries.
    #[must_use]
    pub fn from_config(entries: &[WatchEntryConfig]) -> Self {
        let items = entries
            .iter()
            .map(|entry| {
                WatchItem::new(
                    ProductId::from(entry.product_id.as_str()),
                    entry.name.clone(),
                    FilterCriteria::new(
                        entry.language.clone(),
                        entry.condition.clone(),
                        entry.min_quantity.unwrap_or(1),
                    ),
                )
            })
            .collect();
        Self::new(items)
    }

    /// Replace the tracked items. Cycles already running keep the
    /// snapshot they started with.
    pub fn replace(&self, items: Vec<WatchItem>) {
        *self.items.write() = items;
    }
}

impl WatchlistProvider for InMemoryWatchlist {
    fn list(&self) -> Vec<WatchItem> {
        self.items.read().clone()
    }
}
