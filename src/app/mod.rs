//! Application wiring: builds the adapters, the pricing service, and the
//! scheduler, then runs until a shutdown signal arrives.

pub mod pricing;
pub mod scheduler;

pub use pricing::{CycleError, CycleReport, ItemFailure, PricingService};
pub use scheduler::{Scheduler, SchedulerState};

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{info, warn};

use crate::adapter::sqlite::{create_pool, run_migrations};
use crate::adapter::{ConsoleNotifier, InMemoryWatchlist, MarketplaceClient, SqliteHistoryStore};
use crate::config::Config;
use crate::error::Result;
use crate::port::{LogNotifier, NotifierRegistry, WatchlistProvider};

/// Main application struct.
pub struct App;

impl App {
    /// Run the polling pipeline until ctrl-c, then drain gracefully.
    pub async fn run(config: Config) -> Result<()> {
        config.storage.ensure_directories()?;

        let database_url = config.storage.database_url();
        let pool = create_pool(&database_url)?;
        run_migrations(&pool)?;
        let store = SqliteHistoryStore::new(pool);
        info!(database = %database_url, "History store initialized");

        let fetcher = MarketplaceClient::from_config(&config.marketplace)?;

        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(ConsoleNotifier));
        notifiers.register(Box::new(LogNotifier));
        info!(notifiers = notifiers.len(), "Notifiers initialized");

        let watchlist = Arc::new(InMemoryWatchlist::from_config(&config.watchlist));
        let tracked = watchlist.list().len();
        if tracked == 0 {
            warn!("Watchlist is empty; polling cycles will do nothing");
        } else {
            info!(items = tracked, "Watchlist loaded");
        }

        let service = Arc::new(PricingService::new(
            fetcher,
            store,
            notifiers,
            config.thresholds.clone(),
            config.polling.max_concurrent_requests,
        ));

        let interval = Duration::from_secs(config.polling.interval_seconds);
        let scheduler = Scheduler::start(interval, move |cancel| {
            let service = Arc::clone(&service);
            let watchlist = Arc::clone(&watchlist);
            async move {
                let items = watchlist.list();
                let report = service.run_cycle(items, cancel).await;
                for failure in &report.failures {
                    warn!(
                        product_id = %failure.product_id,
                        error = %failure.error,
                        "Item failed this cycle"
                    );
                }
            }
        });
        info!(
            interval_seconds = config.polling.interval_seconds,
            "Scheduler started"
        );

        signal::ctrl_c().await?;
        info!("Shutdown signal received");
        scheduler.stop().await;

        Ok(())
    }
}
