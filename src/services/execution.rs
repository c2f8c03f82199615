//! Order execution seam. Only consulted when auto-trading is enabled.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::signals::TradeOrder;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("order rejected: {0}")]
    Rejected(String),
    #[error("broker unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TradeExecutor: Send + Sync {
    async fn execute(&self, order: &TradeOrder) -> Result<(), ExecutionError>;
}

/// Dry-run executor that logs the order it would have sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTradeExecutor;

#[async_trait]
impl TradeExecutor for LoggingTradeExecutor {
    async fn execute(&self, order: &TradeOrder) -> Result<(), ExecutionError> {
        warn!(
            symbol = %order.symbol,
            side = ?order.side,
            lot_size = order.lot_size,
            entry = order.entry,
            stop_loss = order.stop_loss,
            take_profit = order.take_profit,
            comment = %order.comment,
            "Auto-trading order (dry run)"
        );
        Ok(())
    }
}
