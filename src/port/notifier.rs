//! Notifier port for alert delivery.
//!
//! New channels are added by implementing [`Notifier`] and registering
//! them, never by subclassing anything; [`NotifierRegistry`] is the
//! fan-out composite that delivers one alert to every channel
//! independently.

use async_trait::async_trait;
use tracing::info;

use crate::domain::PriceAlert;
use crate::error::NotifyError;

/// A single notification channel.
///
/// Implementations must be thread-safe and tolerate concurrent `notify`
/// calls. Delivery is at-least-once: a cycle that fails midway may
/// re-deliver an alert on a later retry path.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in reports and logs.
    fn name(&self) -> &'static str;

    /// Deliver one alert.
    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError>;
}

/// A delivery failure on one channel, reported to the caller rather than
/// escalated.
#[derive(Debug)]
pub struct ChannelFailure {
    pub channel: &'static str,
    pub error: NotifyError,
}

/// Registry of notifiers (composite pattern).
///
/// Dispatches alerts to all registered channels; one channel's failure
/// never suppresses delivery to the others.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a channel.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Deliver `alert` to every channel, returning the failures.
    pub async fn dispatch(&self, alert: &PriceAlert) -> Vec<ChannelFailure> {
        let mut failures = Vec::new();
        for notifier in &self.notifiers {
            if let Err(error) = notifier.notify(alert).await {
                failures.push(ChannelFailure {
                    channel: notifier.name(),
                    error,
                });
            }
        }
        failures
    }

    /// Number of registered channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn notify(&self, _alert: &PriceAlert) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// A notifier that records alerts via tracing.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError> {
        info!(
            product_id = %alert.product_id,
            reason = %alert.reason,
            previous_price = ?alert.previous_price,
            new_price = %alert.new_price,
            "Price alert"
        );
        Ok(())
    }
}
