//! Rolling-window helpers shared by the indicator calculators.
//!
//! Every helper returns a series aligned with its input; positions without a
//! full window are `None`.

use crate::models::indicators::Series;
use crate::models::Candle;

/// Simple moving average over a dense input.
pub fn sma(values: &[f64], window: usize) -> Series {
    let dense: Series = values.iter().copied().map(Some).collect();
    sma_of(&dense, window)
}

/// Simple moving average over a sparse input. A window containing any
/// undefined value is itself undefined.
pub fn sma_of(values: &[Option<f64>], window: usize) -> Series {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(Option::is_some) {
            let sum: f64 = slice.iter().flatten().sum();
            out[i] = Some(sum / window as f64);
        }
    }
    out
}

/// Rolling population standard deviation.
pub fn rolling_std(values: &[f64], window: usize) -> Series {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
        out[i] = Some(variance.sqrt());
    }
    out
}

pub fn rolling_max(values: &[f64], window: usize) -> Series {
    rolling_fold(values, window, f64::max)
}

pub fn rolling_min(values: &[f64], window: usize) -> Series {
    rolling_fold(values, window, f64::min)
}

fn rolling_fold(values: &[f64], window: usize, fold: fn(f64, f64) -> f64) -> Series {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        out[i] = slice.iter().copied().reduce(fold);
    }
    out
}

/// Exponential moving average seeded with the simple average of the first
/// `window` consecutive defined values. Leading undefined values are skipped,
/// so the helper can smooth derived series such as the MACD line.
pub fn ema(values: &[Option<f64>], window: usize) -> Series {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 {
        return out;
    }
    let Some(first) = values.iter().position(Option::is_some) else {
        return out;
    };
    let seed_end = first + window - 1;
    if seed_end >= n {
        return out;
    }
    let seed_window = &values[first..=seed_end];
    if !seed_window.iter().all(Option::is_some) {
        return out;
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = seed_window.iter().flatten().sum::<f64>() / window as f64;
    out[seed_end] = Some(prev);
    for i in (seed_end + 1)..n {
        if let Some(value) = values[i] {
            prev = alpha * value + (1.0 - alpha) * prev;
            out[i] = Some(prev);
        }
    }
    out
}

/// True range per bar. The first bar has no previous close and uses
/// high - low.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let range = c.high - c.low;
            match i.checked_sub(1).map(|p| candles[p].close) {
                Some(prev_close) => range
                    .max((c.high - prev_close).abs())
                    .max((c.low - prev_close).abs()),
                None => range,
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
