//! Swing high / swing low detection

use crate::models::{CandleSeries, SwingPoint};

/// Swing highs (from candle highs) and swing lows (from candle lows),
/// each ordered by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingPoints {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Max,
    Min,
}

/// Find swing highs and lows separated by at least `min_separation` bars.
pub fn find_swing_points(series: &CandleSeries, min_separation: usize) -> SwingPoints {
    SwingPoints {
        highs: local_extrema(&series.highs(), min_separation, Extremum::Max),
        lows: local_extrema(&series.lows(), min_separation, Extremum::Min),
    }
}

/// A point is a local maximum (minimum) when no other point within
/// `min_separation` bars on either side is strictly higher (lower).
///
/// The first and last points have no neighbour on one side and never
/// qualify. An equal, earlier point that is itself unbeaten within its own
/// window takes precedence, so a flat stretch yields one swing point rather
/// than one per bar.
pub fn local_extrema(values: &[f64], min_separation: usize, extremum: Extremum) -> Vec<SwingPoint> {
    let n = values.len();
    if n < 3 {
        return Vec::new();
    }
    let separation = min_separation.max(1);

    let window = |i: usize| i.saturating_sub(separation)..=(i + separation).min(n - 1);
    let beaten = |i: usize| {
        window(i).any(|j| match extremum {
            Extremum::Max => values[j] > values[i],
            Extremum::Min => values[j] < values[i],
        })
    };

    (1..n - 1)
        .filter(|&i| {
            !beaten(i)
                && !window(i).any(|j| j < i && values[j] == values[i] && !beaten(j))
        })
        .map(|index| SwingPoint {
            index,
            price: values[index],
        })
        .collect()
}
