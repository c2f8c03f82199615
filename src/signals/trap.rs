//! Phantom trap detection: a break of a strong level that volume does not
//! confirm.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::EvaluationContext;
use crate::indicators::math::mean;
use crate::models::{Level, Signal, SignalKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapParams {
    /// Bars preceding the latest one that make up the volume baseline.
    pub volume_period: usize,
    /// A breakout is unconfirmed when its volume is below this fraction of
    /// the baseline.
    pub volume_threshold_ratio: f64,
}

impl Default for TrapParams {
    fn default() -> Self {
        Self {
            volume_period: 20,
            volume_threshold_ratio: 0.8,
        }
    }
}

/// Report at most one trap for the latest bar.
///
/// Resistance levels are checked before support levels, each in stored
/// order, and the first qualifying level wins. Without a full volume
/// baseline (`volume_period` bars before the latest) nothing is reported.
pub fn detect_phantom_trap(ctx: &EvaluationContext<'_>, params: &TrapParams) -> Option<Signal> {
    let series = ctx.series;
    let period = params.volume_period.max(1);
    if series.len() < period + 1 {
        return None;
    }
    let latest = ctx.latest()?;
    let previous = ctx.previous()?;

    let volumes = series.volumes();
    let baseline = &volumes[volumes.len() - 1 - period..volumes.len() - 1];
    let average = mean(baseline)?;
    let threshold = average * params.volume_threshold_ratio;
    if latest.volume >= threshold {
        return None;
    }

    let volume_reason = format!(
        "volume {:.0} below {:.0}% of {}-bar average {:.0}",
        latest.volume,
        params.volume_threshold_ratio * 100.0,
        period,
        average
    );

    let crossed_up = |level: &&Level| previous.close < level.price && latest.close > level.price;
    let crossed_down = |level: &&Level| previous.close > level.price && latest.close < level.price;

    let (kind, reason) = if let Some(level) = ctx.levels.resistance.iter().find(crossed_up) {
        (
            SignalKind::TrapAlertSell,
            format!(
                "phantom breakout above strong resistance ({})",
                ctx.format_price(level.price)
            ),
        )
    } else if let Some(level) = ctx.levels.support.iter().find(crossed_down) {
        (
            SignalKind::TrapAlertBuy,
            format!(
                "phantom breakdown below strong support ({})",
                ctx.format_price(level.price)
            ),
        )
    } else {
        return None;
    };

    debug!(
        symbol = %ctx.symbol,
        kind = %kind,
        volume = latest.volume,
        average_volume = average,
        "Phantom trap detected"
    );

    Some(Signal::new(
        kind,
        latest.close,
        latest.timestamp,
        vec![reason, volume_reason],
    ))
}
