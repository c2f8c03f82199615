//! EMA (Exponential Moving Average) indicator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::math;
use crate::models::indicators::{EmaSeries, Series};
use crate::models::Candle;

/// Calculate EMA of closes for a specific period, seeded with the simple
/// average of the first `period` closes.
pub fn calculate_ema(candles: &[Candle], period: u32) -> Result<EmaSeries, IndicatorError> {
    let window = ensure_period("EMA", period)?;
    let closes: Series = candles.iter().map(|c| Some(c.close)).collect();
    Ok(EmaSeries {
        period,
        values: math::ema(&closes, window),
    })
}

/// Calculate multiple EMAs at once
pub fn calculate_emas(candles: &[Candle], periods: &[u32]) -> Result<Vec<EmaSeries>, IndicatorError> {
    periods
        .iter()
        .map(|&period| calculate_ema(candles, period))
        .collect()
}
