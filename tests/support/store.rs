use cardwatch::domain::{FilterCriteria, PriceEntry, ProductId};
use cardwatch::error::StoreError;
use cardwatch::port::HistoryStore;

/// A store whose every operation fails, for item-scoped error tests.
pub struct FailingStore;

impl HistoryStore for FailingStore {
    async fn append(&self, _entry: &PriceEntry) -> Result<(), StoreError> {
        Err(StoreError::Database("scripted append failure".into()))
    }

    async fn latest(
        &self,
        _product: &ProductId,
        _filter: &FilterCriteria,
    ) -> Result<Option<PriceEntry>, StoreError> {
        Err(StoreError::Database("scripted read failure".into()))
    }

    async fn history(&self, _product: &ProductId) -> Result<Vec<PriceEntry>, StoreError> {
        Err(StoreError::Database("scripted read failure".into()))
    }
}
