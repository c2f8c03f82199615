//! Fibonacci retracement levels

use crate::models::{CandleSeries, FibonacciLevel};

pub const FIBONACCI_RATIOS: [f64; 4] = [0.236, 0.382, 0.5, 0.618];

/// Retracements over the trailing `window` bars, measured down from the
/// window high: level = high - (high - low) * ratio.
pub fn find_fibonacci_levels(series: &CandleSeries, window: usize) -> Vec<FibonacciLevel> {
    let recent = series.tail(window);
    if recent.is_empty() {
        return Vec::new();
    }

    let high = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let span = high - low;

    FIBONACCI_RATIOS
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: high - span * ratio,
        })
        .collect()
}
