//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::math;
use crate::models::indicators::{MacdSeries, Series};
use crate::models::Candle;

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Result<MacdSeries, IndicatorError> {
    let fast = ensure_period("MACD fast", fast_period)?;
    let slow = ensure_period("MACD slow", slow_period)?;
    let signal = ensure_period("MACD signal", signal_period)?;
    if fast >= slow {
        return Err(IndicatorError::MacdPeriods {
            fast: fast_period,
            slow: slow_period,
        });
    }

    let closes: Series = candles.iter().map(|c| Some(c.close)).collect();
    let fast_ema = math::ema(&closes, fast);
    let slow_ema = math::ema(&closes, slow);

    let macd: Series = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = math::ema(&macd, signal);
    let histogram: Series = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    Ok(MacdSeries {
        macd,
        signal: signal_line,
        histogram,
        period: (fast_period, slow_period, signal_period),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Result<MacdSeries, IndicatorError> {
    calculate_macd(candles, 12, 26, 9)
}
