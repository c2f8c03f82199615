//! ATR (Average True Range) indicator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::math;
use crate::models::indicators::AtrSeries;
use crate::models::Candle;

/// Calculate ATR (Average True Range)
///
/// True range needs the previous close, so the seed is the simple average of
/// the true ranges of bars `1..=period`, placed at index `period`. Later
/// values use Wilder smoothing: ATR = (prev * (period - 1) + TR) / period.
pub fn calculate_atr(candles: &[Candle], period: u32) -> Result<AtrSeries, IndicatorError> {
    let window = ensure_period("ATR", period)?;
    let n = candles.len();
    let mut values = vec![None; n];

    if n < window + 1 {
        return Ok(AtrSeries { period, values });
    }

    let tr = math::true_range(candles);
    let mut atr = tr[1..=window].iter().sum::<f64>() / window as f64;
    values[window] = Some(atr);
    for i in (window + 1)..n {
        atr = (atr * (window as f64 - 1.0) + tr[i]) / window as f64;
        values[i] = Some(atr);
    }

    Ok(AtrSeries { period, values })
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(candles: &[Candle]) -> Result<AtrSeries, IndicatorError> {
    calculate_atr(candles, 14)
}
