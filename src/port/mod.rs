//! Ports consumed and exposed by the polling core.
//!
//! Traits only; concrete implementations live under [`crate::adapter`].

pub mod fetch;
pub mod notifier;
pub mod store;
pub mod watchlist;

pub use fetch::SnapshotFetcher;
pub use notifier::{ChannelFailure, LogNotifier, Notifier, NotifierRegistry, NullNotifier};
pub use store::HistoryStore;
pub use watchlist::WatchlistProvider;
