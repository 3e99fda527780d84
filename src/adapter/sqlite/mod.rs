//! SQLite persistence adapter: the history store and its CSV export.

pub mod database;
pub mod export;
pub mod store;

pub use database::{create_pool, run_migrations, DbPool};
pub use store::SqliteHistoryStore;
