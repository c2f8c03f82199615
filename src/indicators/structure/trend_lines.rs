//! Two-point trend lines through the most recent swing points

use super::swing::find_swing_points;
use crate::models::{AnchorPoint, CandleSeries, LevelRole, SwingPoint, TrendLine, TrendLines};

/// Connect the two most recent swing lows (support) and the two most recent
/// swing highs (resistance). A side with fewer than two swing points has no
/// line.
pub fn find_trend_lines(series: &CandleSeries, min_separation: usize) -> TrendLines {
    let swings = find_swing_points(series, min_separation);
    TrendLines {
        support: line_through_last_two(series, &swings.lows, LevelRole::Support),
        resistance: line_through_last_two(series, &swings.highs, LevelRole::Resistance),
    }
}

fn line_through_last_two(
    series: &CandleSeries,
    points: &[SwingPoint],
    role: LevelRole,
) -> Option<TrendLine> {
    let [.., first, second] = points else {
        return None;
    };
    Some(TrendLine {
        role,
        start: anchor(series, first)?,
        end: anchor(series, second)?,
    })
}

fn anchor(series: &CandleSeries, point: &SwingPoint) -> Option<AnchorPoint> {
    let candle = series.get(point.index)?;
    Some(AnchorPoint {
        index: point.index,
        timestamp: candle.timestamp,
        price: point.price,
    })
}
