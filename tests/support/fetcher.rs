use std::collections::HashMap;

use cardwatch::domain::{ObservationBatch, WatchItem};
use cardwatch::error::FetchError;
use cardwatch::port::SnapshotFetcher;
use parking_lot::Mutex;

/// What the scripted fetcher should do for one product.
pub enum Script {
    Return(ObservationBatch),
    Fail,
}

/// Fetcher driven by a per-product script, for cycle tests.
///
/// Unscripted products return an empty batch. Scripted batches are
/// consumed in order, so consecutive cycles can observe different
/// snapshots; the last script for a product repeats once exhausted.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, Vec<Script>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, product: &str, script: Script) {
        self.scripts
            .lock()
            .entry(product.to_string())
            .or_default()
            .push(script);
    }

    fn next(&self, product: &str) -> Result<ObservationBatch, FetchError> {
        let mut scripts = self.scripts.lock();
        let Some(queue) = scripts.get_mut(product) else {
            return Ok(Vec::new());
        };
        let script = if queue.len() > 1 {
            queue.remove(0)
        } else {
            match queue.first() {
                Some(Script::Return(batch)) => Script::Return(batch.clone()),
                Some(Script::Fail) => Script::Fail,
                None => return Ok(Vec::new()),
            }
        };
        match script {
            Script::Return(batch) => Ok(batch),
            Script::Fail => Err(FetchError::Payload("scripted fetch failure".into())),
        }
    }
}

impl SnapshotFetcher for ScriptedFetcher {
    async fn fetch(&self, item: &WatchItem) -> Result<ObservationBatch, FetchError> {
        self.next(item.product_id().as_str())
    }
}
