//! Strong support and resistance levels
//!
//! Swing points are clustered by price; a cluster that was touched at least
//! `min_touches` times becomes a strong level at the cluster mean.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::swing::find_swing_points;
use crate::models::{CandleSeries, Level, LevelRole, StrongLevels, SwingPoint};

/// Price increment of one pip: 0.01 for JPY-quoted pairs, 0.0001 otherwise.
pub fn pip_size(symbol: &str) -> f64 {
    if symbol.to_ascii_uppercase().contains("JPY") {
        0.01
    } else {
        0.0001
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Minimum bar distance between swing points.
    pub min_separation: usize,
    /// Clustering distance, in pips of the instrument.
    pub tolerance_pips: f64,
    pub min_touches: usize,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            min_separation: 10,
            tolerance_pips: 20.0,
            min_touches: 3,
        }
    }
}

impl LevelParams {
    /// Clustering tolerance in price units for `symbol`.
    pub fn tolerance_for(&self, symbol: &str) -> f64 {
        self.tolerance_pips * pip_size(symbol)
    }
}

/// Cluster swing points by price.
///
/// Prices are walked in ascending order; a point joins the current cluster
/// while it lies within `tolerance` of the cluster's last member. Clusters
/// with fewer than `min_touches` members are dropped. The result is ordered
/// by ascending price.
pub fn cluster_levels(
    points: &[SwingPoint],
    tolerance: f64,
    min_touches: usize,
    role: LevelRole,
) -> Vec<Level> {
    let tolerance = if tolerance.is_finite() { tolerance.max(0.0) } else { 0.0 };
    let mut prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    prices.sort_by(f64::total_cmp);

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for price in prices {
        match clusters.last_mut() {
            Some(cluster) if cluster.last().is_some_and(|&last| price <= last + tolerance) => {
                cluster.push(price)
            }
            _ => clusters.push(vec![price]),
        }
    }

    clusters
        .into_iter()
        .filter(|cluster| cluster.len() >= min_touches.max(1))
        .map(|touches| Level {
            price: touches.iter().sum::<f64>() / touches.len() as f64,
            role,
            strength: touches.len(),
            touches,
        })
        .collect()
}

/// Detect strong support (from swing lows) and resistance (from swing highs).
pub fn find_strong_levels(series: &CandleSeries, symbol: &str, params: &LevelParams) -> StrongLevels {
    if series.is_empty() {
        return StrongLevels::default();
    }

    let swings = find_swing_points(series, params.min_separation);
    let tolerance = params.tolerance_for(symbol);
    let levels = StrongLevels {
        support: cluster_levels(&swings.lows, tolerance, params.min_touches, LevelRole::Support),
        resistance: cluster_levels(
            &swings.highs,
            tolerance,
            params.min_touches,
            LevelRole::Resistance,
        ),
    };

    debug!(
        symbol = %symbol,
        support = ?levels.support.iter().map(|l| l.price).collect::<Vec<_>>(),
        resistance = ?levels.resistance.iter().map(|l| l.price).collect::<Vec<_>>(),
        "Strong levels detected"
    );

    levels
}
