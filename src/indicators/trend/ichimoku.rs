//! Ichimoku Kinko Hyo

use crate::indicators::error::{ensure_period, IndicatorError};
use crate::indicators::math;
use crate::models::indicators::{IchimokuSeries, Series};
use crate::models::Candle;

/// Calculate Ichimoku lines aligned to the input index.
///
/// Senkou spans are plotted `kijun_period` bars ahead, so the value at index
/// `i` is the one computed at `i - kijun_period`. The chikou span at `i` is
/// the close `kijun_period` bars later. Fewer than `senkou_b_period` candles
/// leave every line undefined.
pub fn calculate_ichimoku(
    candles: &[Candle],
    tenkan_period: u32,
    kijun_period: u32,
    senkou_b_period: u32,
) -> Result<IchimokuSeries, IndicatorError> {
    let tenkan_window = ensure_period("Ichimoku tenkan", tenkan_period)?;
    let kijun_window = ensure_period("Ichimoku kijun", kijun_period)?;
    let senkou_b_window = ensure_period("Ichimoku senkou B", senkou_b_period)?;

    let n = candles.len();
    if n < senkou_b_window {
        return Ok(IchimokuSeries {
            tenkan: vec![None; n],
            kijun: vec![None; n],
            senkou_a: vec![None; n],
            senkou_b: vec![None; n],
            chikou: vec![None; n],
        });
    }

    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let tenkan = midpoint(&highs, &lows, tenkan_window);
    let kijun = midpoint(&highs, &lows, kijun_window);
    let base_b = midpoint(&highs, &lows, senkou_b_window);

    let shift = kijun_window;
    let senkou_a: Series = (0..n)
        .map(|i| {
            let src = i.checked_sub(shift)?;
            Some((tenkan[src]? + kijun[src]?) / 2.0)
        })
        .collect();
    let senkou_b: Series = (0..n)
        .map(|i| i.checked_sub(shift).and_then(|src| base_b[src]))
        .collect();
    let chikou: Series = (0..n)
        .map(|i| candles.get(i + shift).map(|c| c.close))
        .collect();

    Ok(IchimokuSeries {
        tenkan,
        kijun,
        senkou_a,
        senkou_b,
        chikou,
    })
}

/// Calculate Ichimoku with the classic (9, 26, 52) settings
pub fn calculate_ichimoku_default(candles: &[Candle]) -> Result<IchimokuSeries, IndicatorError> {
    calculate_ichimoku(candles, 9, 26, 52)
}

fn midpoint(highs: &[f64], lows: &[f64], window: usize) -> Series {
    let highest = math::rolling_max(highs, window);
    let lowest = math::rolling_min(lows, window);
    highest
        .iter()
        .zip(&lowest)
        .map(|(h, l)| Some(((*h)? + (*l)?) / 2.0))
        .collect()
}
