//! Stochastic oscillator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::math;
use crate::models::indicators::{Series, StochasticSeries};
use crate::models::Candle;

/// Calculate the slow stochastic.
///
/// raw %K = 100 * (close - lowest low) / (highest high - lowest low) over `k_period`
/// %K = SMA(`smooth_k`) of raw %K
/// %D = SMA(`d_period`) of %K
///
/// A window whose high equals its low has no defined position and stays
/// undefined.
pub fn calculate_stochastic(
    candles: &[Candle],
    k_period: u32,
    d_period: u32,
    smooth_k: u32,
) -> Result<StochasticSeries, IndicatorError> {
    let k_window = ensure_period("Stochastic %K", k_period)?;
    let d_window = ensure_period("Stochastic %D", d_period)?;
    let smooth_window = ensure_period("Stochastic smoothing", smooth_k)?;

    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let highest = math::rolling_max(&highs, k_window);
    let lowest = math::rolling_min(&lows, k_window);

    let raw: Series = candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let (high, low) = (highest[i]?, lowest[i]?);
            let range = high - low;
            if range == 0.0 {
                return None;
            }
            Some(100.0 * (c.close - low) / range)
        })
        .collect();

    let k = math::sma_of(&raw, smooth_window);
    let d = math::sma_of(&k, d_window);

    Ok(StochasticSeries {
        k,
        d,
        period: (k_period, d_period, smooth_k),
    })
}

/// Calculate the stochastic with default parameters (14, 3, 3)
pub fn calculate_stochastic_default(candles: &[Candle]) -> Result<StochasticSeries, IndicatorError> {
    calculate_stochastic(candles, 14, 3, 3)
}
