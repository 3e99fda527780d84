use cardwatch::adapter::sqlite::{create_pool, run_migrations, DbPool, SqliteHistoryStore};
use tempfile::TempDir;

/// Temporary SQLite database for integration tests.
///
/// The directory (and database file) is removed when this guard drops.
pub struct TempDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir.path().join("history.db").display().to_string();
        let pool = create_pool(&url).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn store(&self) -> SqliteHistoryStore {
        SqliteHistoryStore::new(self.pool.clone())
    }
}
