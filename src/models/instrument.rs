//! Instruments and timeframes monitored by the runners.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    H1,
    D1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::H1,
        Timeframe::D1,
    ];

    /// Bar length, which is also the polling cadence.
    pub fn interval(&self) -> Duration {
        let secs = match self {
            Timeframe::M1 => 60,
            Timeframe::M5 => 300,
            Timeframe::M15 => 900,
            Timeframe::H1 => 3_600,
            Timeframe::D1 => 86_400,
        };
        Duration::from_secs(secs)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::H1 => "H1",
            Timeframe::D1 => "D1",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseInstrumentError {
    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),
    #[error("instrument '{0}' must look like SYMBOL:TIMEFRAME")]
    Malformed(String),
}

impl FromStr for Timeframe {
    type Err = ParseInstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M1" => Ok(Timeframe::M1),
            "M5" => Ok(Timeframe::M5),
            "M15" => Ok(Timeframe::M15),
            "H1" => Ok(Timeframe::H1),
            "D1" => Ok(Timeframe::D1),
            other => Err(ParseInstrumentError::UnknownTimeframe(other.to_string())),
        }
    }
}

/// A (symbol, timeframe) pair. Exactly one runner owns each key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl InstrumentKey {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.symbol, self.timeframe)
    }
}

impl FromStr for InstrumentKey {
    type Err = ParseInstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, timeframe) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParseInstrumentError::Malformed(s.to_string()))?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ParseInstrumentError::Malformed(s.to_string()));
        }
        Ok(Self::new(symbol.to_ascii_uppercase(), timeframe.parse()?))
    }
}
