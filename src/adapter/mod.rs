//! Concrete implementations of the ports: marketplace HTTP client,
//! SQLite history store, notification channels, and the in-memory
//! watchlist.

pub mod marketplace;
pub mod notifier;
pub mod sqlite;
pub mod watchlist;

pub use marketplace::MarketplaceClient;
pub use notifier::ConsoleNotifier;
pub use sqlite::SqliteHistoryStore;
pub use watchlist::InMemoryWatchlist;
