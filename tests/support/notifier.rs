use std::sync::Arc;

use async_trait::async_trait;
use cardwatch::domain::PriceAlert;
use cardwatch::error::NotifyError;
use cardwatch::port::Notifier;
use parking_lot::Mutex;

/// Thread-safe alert collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<PriceAlert>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    pub fn alerts(&self) -> Vec<PriceAlert> {
        self.alerts.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError> {
        self.alerts.lock().push(alert.clone());
        Ok(())
    }
}

/// A channel that always fails delivery.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn notify(&self, _alert: &PriceAlert) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("scripted delivery failure".into()))
    }
}
