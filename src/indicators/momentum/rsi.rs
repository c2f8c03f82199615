//! RSI (Relative Strength Index) indicator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::models::indicators::RsiSeries;
use crate::models::Candle;

/// Calculate RSI with Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// The first `period` positions are undefined. A window with neither gains
/// nor losses reads as a neutral 50.
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Result<RsiSeries, IndicatorError> {
    let window = ensure_period("RSI", period)?;
    let n = candles.len();
    let mut values = vec![None; n];

    if n < window + 1 {
        return Ok(RsiSeries { period, values });
    }

    let changes: Vec<f64> = candles.windows(2).map(|w| w[1].close - w[0].close).collect();

    let (mut avg_gain, mut avg_loss) = changes[..window]
        .iter()
        .fold((0.0, 0.0), |(gain, loss), &change| {
            (gain + change.max(0.0), loss + (-change).max(0.0))
        });
    avg_gain /= window as f64;
    avg_loss /= window as f64;
    values[window] = Some(rsi_from_averages(avg_gain, avg_loss));

    let alpha = 1.0 / window as f64;
    for (offset, &change) in changes.iter().enumerate().skip(window) {
        avg_gain = alpha * change.max(0.0) + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * (-change).max(0.0) + (1.0 - alpha) * avg_loss;
        values[offset + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(RsiSeries { period, values })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Result<RsiSeries, IndicatorError> {
    calculate_rsi(candles, 14)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 50.0;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
