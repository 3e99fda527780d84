//! Console notification channel.

use std::io::Write;

use async_trait::async_trait;

use crate::domain::{AlertReason, PriceAlert};
use crate::error::NotifyError;
use crate::port::Notifier;

/// Renders each alert as a single human-readable line on stdout.
///
/// The default channel: it only fails when the output stream itself is
/// unavailable.
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// The one-line rendering, exposed for tests.
    #[must_use]
    pub fn render(alert: &PriceAlert) -> String {
        let prices = match (alert.previous_price, alert.reason) {
            (_, AlertReason::QuantityChange) => format!(
                "{} copies available (was {})",
                alert.new_quantity,
                alert
                    .previous_quantity
                    .map_or_else(|| "?".to_string(), |q| q.to_string()),
            ),
            (Some(previous), _) => format!(
                "{} {} -> {} {}",
                previous, alert.currency, alert.new_price, alert.currency
            ),
            (None, _) => format!("{} {}", alert.new_price, alert.currency),
        };

        format!(
            "[{}] {} {} {}/{} {}",
            alert.observed_at.format("%Y-%m-%dT%H:%M:%SZ"),
            alert.product_id,
            alert.reason,
            alert.language,
            alert.condition,
            prices,
        )
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", Self::render(alert))
            .map_err(|e| NotifyError::ChannelUnavailable(e.to_string()))
    }
}
