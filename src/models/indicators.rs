//! Statically typed indicator outputs.
//!
//! Every series is aligned 1:1 with the candle series it was computed from.
//! `None` marks positions without enough history for the lookback window.

use serde::{Deserialize, Serialize};

/// One value per candle, `None` while the lookback window is still filling.
pub type Series = Vec<Option<f64>>;

/// Value at `index`, flattening out-of-range and undefined positions.
pub fn value_at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}

/// Value at the latest position.
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Value one position before the latest.
pub fn previous(series: &[Option<f64>]) -> Option<f64> {
    series
        .len()
        .checked_sub(2)
        .and_then(|index| value_at(series, index))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiSeries {
    pub period: u32,
    pub values: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaSeries {
    pub period: u32,
    pub values: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
    pub period: (u32, u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
    pub period: u32,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
    /// (k period, d period, %K smoothing)
    pub period: (u32, u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtrSeries {
    pub period: u32,
    pub values: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IchimokuSeries {
    pub tenkan: Series,
    pub kijun: Series,
    pub senkou_a: Series,
    pub senkou_b: Series,
    pub chikou: Series,
}

/// Which indicators to compute, and with which parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorPlan {
    pub rsi: Option<u32>,
    pub emas: Vec<u32>,
    pub macd: Option<(u32, u32, u32)>,
    pub bollinger: Option<(u32, f64)>,
    pub stochastic: Option<(u32, u32, u32)>,
    pub atr: Option<u32>,
    pub ichimoku: bool,
}

impl IndicatorPlan {
    pub fn with_rsi(mut self, period: u32) -> Self {
        self.rsi = Some(period);
        self
    }

    pub fn with_ema(mut self, period: u32) -> Self {
        self.emas.push(period);
        self
    }

    pub fn with_macd(mut self, fast: u32, slow: u32, signal: u32) -> Self {
        self.macd = Some((fast, slow, signal));
        self
    }

    pub fn with_bollinger(mut self, period: u32, std_dev: f64) -> Self {
        self.bollinger = Some((period, std_dev));
        self
    }

    pub fn with_stochastic(mut self, k: u32, d: u32, smooth_k: u32) -> Self {
        self.stochastic = Some((k, d, smooth_k));
        self
    }

    pub fn with_atr(mut self, period: u32) -> Self {
        self.atr = Some(period);
        self
    }

    pub fn with_ichimoku(mut self) -> Self {
        self.ichimoku = true;
        self
    }
}

/// Indicator outputs attached to one candle series snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiSeries>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub emas: Vec<EmaSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<StochasticSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<AtrSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ichimoku: Option<IchimokuSeries>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rsi(mut self, rsi: RsiSeries) -> Self {
        self.rsi = Some(rsi);
        self
    }

    pub fn with_ema(mut self, ema: EmaSeries) -> Self {
        self.emas.push(ema);
        self
    }

    pub fn with_macd(mut self, macd: MacdSeries) -> Self {
        self.macd = Some(macd);
        self
    }

    pub fn with_bollinger(mut self, bollinger: BollingerSeries) -> Self {
        self.bollinger = Some(bollinger);
        self
    }

    pub fn with_stochastic(mut self, stochastic: StochasticSeries) -> Self {
        self.stochastic = Some(stochastic);
        self
    }

    pub fn with_atr(mut self, atr: AtrSeries) -> Self {
        self.atr = Some(atr);
        self
    }

    pub fn with_ichimoku(mut self, ichimoku: IchimokuSeries) -> Self {
        self.ichimoku = Some(ichimoku);
        self
    }

    pub fn ema(&self, period: u32) -> Option<&EmaSeries> {
        self.emas.iter().find(|e| e.period == period)
    }
}
