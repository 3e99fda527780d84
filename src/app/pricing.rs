//! Cycle orchestration: fetch, persist, detect, notify per watch item.

use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{detect, PriceAlert, ProductId, Thresholds, WatchItem};
use crate::error::{FetchError, NotifyError, StoreError};
use crate::port::{HistoryStore, NotifierRegistry, SnapshotFetcher};

/// What went wrong while processing one item or delivering one alert.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("channel {channel}: {error}")]
    Notify {
        channel: &'static str,
        error: NotifyError,
    },
}

/// A per-item failure, keyed by product.
#[derive(Debug)]
pub struct ItemFailure {
    pub product_id: ProductId,
    pub error: CycleError,
}

/// The observable outcome of one polling cycle.
///
/// Complete even under partial failure: every attempted item is counted
/// and every error is recorded. A notify failure is reported but does not
/// demote an item whose fetch and persist succeeded.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub items_processed: usize,
    pub items_succeeded: usize,
    pub alerts_raised: usize,
    pub failures: Vec<ItemFailure>,
}

impl CycleReport {
    /// True when every item processed without any recorded failure.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct ItemOutcome {
    product_id: ProductId,
    alerts_raised: usize,
    succeeded: bool,
    failures: Vec<CycleError>,
}

/// Runs one polling cycle across all watch items.
///
/// Items are independent: no single item's failure aborts the batch, and
/// the scheduler never sees an error from a cycle - only the report.
pub struct PricingService<F, S> {
    fetcher: F,
    store: S,
    notifiers: NotifierRegistry,
    thresholds: Thresholds,
    max_concurrent: usize,
}

impl<F, S> PricingService<F, S>
where
    F: SnapshotFetcher,
    S: HistoryStore,
{
    pub fn new(
        fetcher: F,
        store: S,
        notifiers: NotifierRegistry,
        thresholds: Thresholds,
        max_concurrent: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifiers,
            thresholds,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Process every watch item once and aggregate the outcome.
    ///
    /// `cancel` is checked cooperatively before each item is dispatched;
    /// items already in flight always run to completion.
    pub async fn run_cycle(
        &self,
        items: Vec<WatchItem>,
        cancel: watch::Receiver<bool>,
    ) -> CycleReport {
        let outcomes: Vec<Option<ItemOutcome>> = stream::iter(items)
            .map(|item| {
                let cancel = cancel.clone();
                async move {
                    if *cancel.borrow() {
                        debug!(product_id = %item.product_id(), "Skipping item: stop requested");
                        return None;
                    }
                    Some(self.process_item(&item).await)
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut report = CycleReport::default();
        for outcome in outcomes.into_iter().flatten() {
            report.items_processed += 1;
            if outcome.succeeded {
                report.items_succeeded += 1;
            }
            report.alerts_raised += outcome.alerts_raised;
            report
                .failures
                .extend(outcome.failures.into_iter().map(|error| ItemFailure {
                    product_id: outcome.product_id.clone(),
                    error,
                }));
        }

        info!(
            items = report.items_processed,
            alerts = report.alerts_raised,
            failures = report.failures.len(),
            "Cycle complete"
        );

        report
    }

    async fn process_item(&self, item: &WatchItem) -> ItemOutcome {
        let product_id = item.product_id().clone();

        let batch = match self.fetcher.fetch(item).await {
            Ok(batch) => batch,
            Err(error) => {
                warn!(product_id = %product_id, error = %error, "Fetch failed");
                return ItemOutcome::failed(product_id, error.into());
            }
        };

        // The comparison baseline must predate this cycle's appends.
        let previous = match self.store.latest(&product_id, item.filter()).await {
            Ok(previous) => previous,
            Err(error) => {
                warn!(product_id = %product_id, error = %error, "History read failed");
                return ItemOutcome::failed(product_id, error.into());
            }
        };

        for entry in &batch {
            if let Err(error) = self.store.append(entry).await {
                warn!(product_id = %product_id, error = %error, "Append failed");
                return ItemOutcome::failed(product_id, error.into());
            }
        }

        let alerts = detect(previous.as_ref(), &batch, &self.thresholds);
        let mut failures = Vec::new();
        for alert in &alerts {
            failures.extend(self.dispatch_alert(alert).await);
        }

        ItemOutcome {
            product_id,
            alerts_raised: alerts.len(),
            succeeded: true,
            failures,
        }
    }

    async fn dispatch_alert(&self, alert: &PriceAlert) -> Vec<CycleError> {
        self.notifiers
            .dispatch(alert)
            .await
            .into_iter()
            .map(|failure| {
                warn!(
                    channel = failure.channel,
                    error = %failure.error,
                    "Alert delivery failed"
                );
                CycleError::Notify {
                    channel: failure.channel,
                    error: failure.error,
                }
            })
            .collect()
    }
}

impl ItemOutcome {
    fn failed(product_id: ProductId, error: CycleError) -> Self {
        Self {
            product_id,
            alerts_raised: 0,
            succeeded: false,
            failures: vec![error],
        }
    }
}
