//! Trading mode and the externally supplied strategy configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Scalp,
    #[serde(alias = "day_trade", alias = "day-trade")]
    Daytrade,
}

impl TradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Scalp => "scalp",
            TradingMode::Daytrade => "daytrade",
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = InvalidStrategyConfig;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalp" => Ok(TradingMode::Scalp),
            "daytrade" | "day_trade" | "day-trade" => Ok(TradingMode::Daytrade),
            other => Err(InvalidStrategyConfig::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidStrategyConfig {
    #[error("unknown trading mode '{0}'")]
    UnknownMode(String),
    #[error("lot size must be a positive finite number, got {0}")]
    LotSize(f64),
    #[error("stop-loss distance must be positive, got {0} pips")]
    StopLoss(f64),
    #[error("take-profit distance must be positive, got {0} pips")]
    TakeProfit(f64),
}

/// Operating mode plus order sizing. Re-read on every evaluation cycle and
/// never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub mode: TradingMode,
    pub lot_size: f64,
    pub stop_loss_pips: f64,
    pub take_profit_pips: f64,
    #[serde(default)]
    pub auto_trading: bool,
}

impl StrategyConfig {
    pub const DEFAULT_LOT_SIZE: f64 = 0.01;

    /// Preset stop-loss / take-profit distances for a mode.
    pub fn preset_pips(mode: TradingMode) -> (f64, f64) {
        match mode {
            TradingMode::Scalp => (10.0, 15.0),
            TradingMode::Daytrade => (40.0, 80.0),
        }
    }

    pub fn for_mode(mode: TradingMode) -> Self {
        let (stop_loss_pips, take_profit_pips) = Self::preset_pips(mode);
        Self {
            mode,
            lot_size: Self::DEFAULT_LOT_SIZE,
            stop_loss_pips,
            take_profit_pips,
            auto_trading: false,
        }
    }

    pub fn with_lot_size(mut self, lot_size: f64) -> Self {
        self.lot_size = lot_size;
        self
    }

    pub fn with_auto_trading(mut self, enabled: bool) -> Self {
        self.auto_trading = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidStrategyConfig> {
        if !self.lot_size.is_finite() || self.lot_size <= 0.0 {
            return Err(InvalidStrategyConfig::LotSize(self.lot_size));
        }
        if !self.stop_loss_pips.is_finite() || self.stop_loss_pips <= 0.0 {
            return Err(InvalidStrategyConfig::StopLoss(self.stop_loss_pips));
        }
        if !self.take_profit_pips.is_finite() || self.take_profit_pips <= 0.0 {
            return Err(InvalidStrategyConfig::TakeProfit(self.take_profit_pips));
        }
        Ok(())
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::for_mode(TradingMode::Daytrade)
    }
}
