//! Notification sinks. Delivery failures are logged and counted, never
//! propagated to the runner.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{SignalOutput, Timeframe, TradingMode};
use crate::signals::format_price;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{notifier} delivery failed: {reason}")]
    Delivery { notifier: String, reason: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, message: &str, image: Option<&Path>) -> Result<(), NotifyError>;
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn notify(&self, message: &str, image: Option<&Path>) -> Result<(), NotifyError> {
        info!(image = ?image, "{}", message);
        Ok(())
    }
}

/// Zero or more registered notifiers, each tried independently.
#[derive(Clone, Default)]
pub struct NotifierSet {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Deliver to every notifier and return how many failed.
    pub async fn notify_all(&self, message: &str, image: Option<&Path>) -> usize {
        let mut failures = 0;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(message, image).await {
                warn!(notifier = notifier.name(), error = %e, "Notification failed");
                failures += 1;
            }
        }
        failures
    }
}

/// M1 scalp signals fire too often to push to people.
pub fn should_notify(mode: TradingMode, timeframe: Timeframe) -> bool {
    !(mode == TradingMode::Scalp && timeframe == Timeframe::M1)
}

/// Human-readable alert text for an emitted signal.
pub fn notification_message(output: &SignalOutput) -> String {
    let symbol = &output.key.symbol;
    let mut message = format!(
        "[Phantom Alert]\n{} {} {} signal\nprice: {}\nreasons: {}",
        symbol,
        output.key.timeframe,
        output.signal.kind,
        format_price(symbol, output.signal.price),
        output.signal.describe()
    );
    match output.protective {
        Some(levels) => message.push_str(&format!(
            "\nTP: {}\nSL: {}",
            format_price(symbol, levels.take_profit),
            format_price(symbol, levels.stop_loss)
        )),
        None => message.push_str("\nTP: N/A\nSL: N/A"),
    }
    if !output.outlook.is_empty() {
        message.push_str("\noutlook:");
        for line in &output.outlook {
            message.push_str("\n- ");
            message.push_str(line);
        }
    }
    message
}
