//! Forward-looking scenarios attached to emitted signals.

use super::context::format_price;
use crate::indicators::math::mean;
use crate::models::{CandleSeries, FibonacciLevel, StrongLevels, TrendLine, TrendLines};

/// Bars ahead at which trend lines are extrapolated.
pub const PROJECTION_BARS: usize = 3;
/// A Fibonacci level is "near" when closer than this fraction of the
/// average bar span.
pub const FIBONACCI_PROXIMITY: f64 = 0.2;

/// Build outlook lines for the latest close of `series`.
pub fn project_outlook(
    symbol: &str,
    series: &CandleSeries,
    levels: &StrongLevels,
    trend_lines: &TrendLines,
    fibonacci: &[FibonacciLevel],
) -> Vec<String> {
    let Some(latest) = series.latest() else {
        return Vec::new();
    };
    let price = latest.close;
    let mut outlook = Vec::new();

    if let Some(level) = levels.nearest_resistance_above(price) {
        outlook.push(format!(
            "watch for rejection at resistance {} ({} touches)",
            format_price(symbol, level.price),
            level.strength
        ));
    }
    if let Some(level) = levels.nearest_support_below(price) {
        outlook.push(format!(
            "watch for a bounce at support {} ({} touches)",
            format_price(symbol, level.price),
            level.strength
        ));
    }

    if let (Some(high), Some(low)) = (mean(&series.highs()), mean(&series.lows())) {
        let proximity = (high - low) * FIBONACCI_PROXIMITY;
        for level in fibonacci {
            if (price - level.price).abs() < proximity {
                outlook.push(format!(
                    "price is near {} ({})",
                    level.label(),
                    format_price(symbol, level.price)
                ));
            }
        }
    }

    let target = series.len() - 1 + PROJECTION_BARS;
    let mut project = |line: &Option<TrendLine>, name: &str| {
        if let Some(projected) = line.as_ref().and_then(|l| l.project(target)) {
            outlook.push(format!(
                "{} trend line projects {} in {} bars",
                name,
                format_price(symbol, projected),
                PROJECTION_BARS
            ));
        }
    };
    project(&trend_lines.support, "support");
    project(&trend_lines.resistance, "resistance");

    outlook
}
