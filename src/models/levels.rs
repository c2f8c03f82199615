//! Price structure derived from a candle window: swing points, horizontal
//! levels, trend lines and Fibonacci retracements.
//!
//! All of these are recomputed from scratch on every evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A local extremum at `index` in the candle series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelRole {
    Support,
    Resistance,
}

impl fmt::Display for LevelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelRole::Support => write!(f, "support"),
            LevelRole::Resistance => write!(f, "resistance"),
        }
    }
}

/// A horizontal level built from clustered swing points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Mean of the clustered touches.
    pub price: f64,
    pub role: LevelRole,
    /// Number of touches in the cluster.
    pub strength: usize,
    /// Prices of the contributing swing points, ascending.
    pub touches: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrongLevels {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl StrongLevels {
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }

    /// Nearest resistance strictly above `price`.
    pub fn nearest_resistance_above(&self, price: f64) -> Option<&Level> {
        self.resistance
            .iter()
            .filter(|l| l.price > price)
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Nearest support strictly below `price`.
    pub fn nearest_support_below(&self, price: f64) -> Option<&Level> {
        self.support
            .iter()
            .filter(|l| l.price < price)
            .max_by(|a, b| a.price.total_cmp(&b.price))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// A straight line through two swing points, used only for extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub role: LevelRole,
    pub start: AnchorPoint,
    pub end: AnchorPoint,
}

impl TrendLine {
    /// Price change per bar, `None` when both anchors share an index.
    pub fn slope(&self) -> Option<f64> {
        let run = self.end.index as f64 - self.start.index as f64;
        if run == 0.0 {
            return None;
        }
        Some((self.end.price - self.start.price) / run)
    }

    /// Linear projection of the line at bar `index`.
    pub fn project(&self, index: usize) -> Option<f64> {
        let slope = self.slope()?;
        Some(self.start.price + slope * (index as f64 - self.start.index as f64))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendLines {
    pub support: Option<TrendLine>,
    pub resistance: Option<TrendLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

impl FibonacciLevel {
    pub fn label(&self) -> String {
        format!("Fibo {:.1}%", self.ratio * 100.0)
    }
}
