//! Bollinger Bands indicator

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::math;
use crate::models::indicators::{BollingerSeries, Series};
use crate::models::Candle;

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * standard deviation)
/// Lower Band = Middle - (std_dev * standard deviation)
///
/// The deviation is the population standard deviation of the window.
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Result<BollingerSeries, IndicatorError> {
    let window = ensure_period("Bollinger", period)?;
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(IndicatorError::Deviation(std_dev));
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let middle = math::sma(&closes, window);
    let deviation = math::rolling_std(&closes, window);

    let band = |sign: f64| -> Series {
        middle
            .iter()
            .zip(&deviation)
            .map(|(m, s)| Some((*m)? + sign * std_dev * (*s)?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    Ok(BollingerSeries {
        upper,
        middle,
        lower,
        period,
        std_dev,
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Result<BollingerSeries, IndicatorError> {
    calculate_bollinger_bands(candles, 20, 2.0)
}
