//! Signal decisions and the records emitted to downstream sinks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::instrument::InstrumentKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
    StandAside,
    TrapAlertBuy,
    TrapAlertSell,
    None,
}

impl SignalKind {
    /// BUY and SELL are the only kinds that can lead to an order.
    pub fn is_tradeable(&self) -> bool {
        matches!(self, SignalKind::Buy | SignalKind::Sell)
    }

    pub fn is_trap(&self) -> bool {
        matches!(self, SignalKind::TrapAlertBuy | SignalKind::TrapAlertSell)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
            SignalKind::StandAside => "STAND_ASIDE",
            SignalKind::TrapAlertBuy => "TRAP_ALERT_BUY",
            SignalKind::TrapAlertSell => "TRAP_ALERT_SELL",
            SignalKind::None => "NONE",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one candle window. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    /// Human-readable rationale, one entry per rule that fired.
    pub reasons: Vec<String>,
}

impl Signal {
    pub fn new(
        kind: SignalKind,
        price: f64,
        timestamp: DateTime<Utc>,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            kind,
            price,
            timestamp,
            reasons,
        }
    }

    /// Informational "no actionable signal" status.
    pub fn none(price: f64, timestamp: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self::new(SignalKind::None, price, timestamp, vec![reason.into()])
    }

    pub fn describe(&self) -> String {
        if self.reasons.is_empty() {
            "-".to_string()
        } else {
            self.reasons.join(", ")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtectiveLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// What a runner hands to signal sinks: the decision plus its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalOutput {
    pub key: InstrumentKey,
    pub signal: Signal,
    /// True when this is a BUY/SELL that cleared the cooldown.
    pub tradeable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protective: Option<ProtectiveLevels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub outlook: Vec<String>,
    pub emitted_at: DateTime<Utc>,
}

impl SignalOutput {
    pub fn informational(key: InstrumentKey, signal: Signal) -> Self {
        Self {
            key,
            signal,
            tradeable: false,
            protective: None,
            chart: None,
            outlook: Vec::new(),
            emitted_at: Utc::now(),
        }
    }

    pub fn with_protective(mut self, protective: ProtectiveLevels) -> Self {
        self.protective = Some(protective);
        self
    }

    pub fn with_chart(mut self, chart: Option<PathBuf>) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_outlook(mut self, outlook: Vec<String>) -> Self {
        self.outlook = outlook;
        self
    }

    pub fn as_tradeable(mut self) -> Self {
        self.tradeable = true;
        self
    }
}
