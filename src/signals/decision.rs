//! Protective levels and order intents derived from a tradeable signal.

use serde::{Deserialize, Serialize};

use crate::indicators::structure::pip_size;
use crate::models::{ProtectiveLevels, SignalKind, StrategyConfig, TradingMode};

pub struct StopLossTakeProfit;

impl StopLossTakeProfit {
    /// Stop-loss and take-profit around `entry` using the configured pip
    /// distances. Only BUY and SELL have protective levels.
    pub fn calculate(
        kind: SignalKind,
        entry: f64,
        symbol: &str,
        config: &StrategyConfig,
    ) -> Option<ProtectiveLevels> {
        let pip = pip_size(symbol);
        let stop_distance = config.stop_loss_pips * pip;
        let profit_distance = config.take_profit_pips * pip;

        match kind {
            SignalKind::Buy => Some(ProtectiveLevels {
                stop_loss: entry - stop_distance,
                take_profit: entry + profit_distance,
            }),
            SignalKind::Sell => Some(ProtectiveLevels {
                stop_loss: entry + stop_distance,
                take_profit: entry - profit_distance,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Market order handed to the trade executor when auto-trading is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub lot_size: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub comment: String,
}

impl TradeOrder {
    pub fn from_signal(
        symbol: &str,
        kind: SignalKind,
        entry: f64,
        config: &StrategyConfig,
    ) -> Option<Self> {
        let side = match kind {
            SignalKind::Buy => OrderSide::Buy,
            SignalKind::Sell => OrderSide::Sell,
            _ => return None,
        };
        let levels = StopLossTakeProfit::calculate(kind, entry, symbol, config)?;
        Some(Self {
            symbol: symbol.to_string(),
            side,
            lot_size: config.lot_size,
            entry,
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
            comment: order_comment(config.mode),
        })
    }
}

pub fn order_comment(mode: TradingMode) -> String {
    format!("phantom-{}", mode)
}
