//! Technical indicators and market-structure detection.
//!
//! Every calculator is a pure function of a candle slice and returns a series
//! aligned with its input. Bad parameters are an [`IndicatorError`]; short
//! input is not, it yields undefined leading values.

pub mod error;
pub mod math;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;

pub use error::IndicatorError;
pub use momentum::*;
pub use structure::*;
pub use trend::*;
pub use volatility::*;

use crate::models::{CandleSeries, IndicatorPlan, IndicatorSet};

/// Compute every indicator requested by `plan` over `series`.
pub fn compute_indicators(
    series: &CandleSeries,
    plan: &IndicatorPlan,
) -> Result<IndicatorSet, IndicatorError> {
    let candles = series.candles();
    let mut set = IndicatorSet::new();

    if let Some(period) = plan.rsi {
        set = set.with_rsi(calculate_rsi(candles, period)?);
    }
    for ema in calculate_emas(candles, &plan.emas)? {
        set = set.with_ema(ema);
    }
    if let Some((fast, slow, signal)) = plan.macd {
        set = set.with_macd(calculate_macd(candles, fast, slow, signal)?);
    }
    if let Some((period, std_dev)) = plan.bollinger {
        set = set.with_bollinger(calculate_bollinger_bands(candles, period, std_dev)?);
    }
    if let Some((k, d, smooth_k)) = plan.stochastic {
        set = set.with_stochastic(calculate_stochastic(candles, k, d, smooth_k)?);
    }
    if let Some(period) = plan.atr {
        set = set.with_atr(calculate_atr(candles, period)?);
    }
    if plan.ichimoku {
        set = set.with_ichimoku(calculate_ichimoku_default(candles)?);
    }

    Ok(set)
}

impl IndicatorSet {
    pub fn compute(series: &CandleSeries, plan: &IndicatorPlan) -> Result<Self, IndicatorError> {
        compute_indicators(series, plan)
    }
}
