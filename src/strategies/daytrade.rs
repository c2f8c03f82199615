//! Day-trade policy: reversals at strong levels, then breakouts through them.

use tracing::warn;

use super::evaluator::SignalPolicy;
use crate::models::indicators::latest;
use crate::models::{Candle, IndicatorPlan, Level, Signal, SignalKind, TradingMode};
use crate::signals::context::EvaluationContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaytradePolicy {
    pub rsi_period: u32,
    /// RSI must be below this for a reversal BUY.
    pub buy_rsi_below: f64,
    /// RSI must be above this for a reversal SELL.
    pub sell_rsi_above: f64,
}

impl Default for DaytradePolicy {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            buy_rsi_below: 45.0,
            sell_rsi_above: 55.0,
        }
    }
}

/// Inputs every rule sees.
struct Bar<'a> {
    ctx: &'a EvaluationContext<'a>,
    latest: &'a Candle,
    previous: &'a Candle,
    rsi: f64,
    policy: &'a DaytradePolicy,
}

type Rule = fn(&Bar<'_>) -> Option<Signal>;

/// Evaluated top to bottom; the first rule that fires decides the cycle.
const RULES: [Rule; 4] = [
    reversal_at_support,
    reversal_at_resistance,
    breakdown_through_support,
    breakout_through_resistance,
];

impl SignalPolicy for DaytradePolicy {
    fn mode(&self) -> TradingMode {
        TradingMode::Daytrade
    }

    fn min_history(&self) -> usize {
        (self.rsi_period as usize + 1).max(2)
    }

    fn indicator_plan(&self) -> IndicatorPlan {
        IndicatorPlan::default().with_rsi(self.rsi_period)
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<Signal> {
        if ctx.series.len() < self.min_history() {
            warn!(
                symbol = %ctx.symbol,
                bars = ctx.series.len(),
                required = self.min_history(),
                "Insufficient data for day-trade policy"
            );
            return None;
        }

        let Some(rsi) = ctx.indicators.rsi.as_ref().and_then(|r| latest(&r.values)) else {
            warn!(symbol = %ctx.symbol, "RSI undefined at latest bar, skipping");
            return None;
        };

        let bar = Bar {
            ctx,
            latest: ctx.latest()?,
            previous: ctx.previous()?,
            rsi,
            policy: self,
        };
        RULES.iter().find_map(|rule| rule(&bar))
    }
}

fn signal(bar: &Bar<'_>, kind: SignalKind, reasons: Vec<String>) -> Signal {
    Signal::new(kind, bar.latest.close, bar.latest.timestamp, reasons)
}

fn reversal_at_support(bar: &Bar<'_>) -> Option<Signal> {
    if !bar.latest.is_bullish() || bar.rsi >= bar.policy.buy_rsi_below {
        return None;
    }
    let range = bar.latest.range();
    let level = bar
        .ctx
        .levels
        .support
        .iter()
        .find(|level| (bar.latest.low - level.price).abs() < range)?;
    Some(signal(
        bar,
        SignalKind::Buy,
        vec![
            format!("strong support ({}) reversal", bar.ctx.format_price(level.price)),
            format!("RSI {:.1}", bar.rsi),
        ],
    ))
}

fn reversal_at_resistance(bar: &Bar<'_>) -> Option<Signal> {
    if !bar.latest.is_bearish() || bar.rsi <= bar.policy.sell_rsi_above {
        return None;
    }
    let range = bar.latest.range();
    let level = bar
        .ctx
        .levels
        .resistance
        .iter()
        .find(|level| (bar.latest.high - level.price).abs() < range)?;
    Some(signal(
        bar,
        SignalKind::Sell,
        vec![
            format!("strong resistance ({}) reversal", bar.ctx.format_price(level.price)),
            format!("RSI {:.1}", bar.rsi),
        ],
    ))
}

fn breakdown_through_support(bar: &Bar<'_>) -> Option<Signal> {
    let level = first_crossed(&bar.ctx.levels.support, |price| {
        bar.previous.close > price && bar.latest.close < price
    })?;
    Some(signal(
        bar,
        SignalKind::StandAside,
        vec![format!(
            "broke below strong support ({}): trend reversal risk",
            bar.ctx.format_price(level.price)
        )],
    ))
}

fn breakout_through_resistance(bar: &Bar<'_>) -> Option<Signal> {
    let level = first_crossed(&bar.ctx.levels.resistance, |price| {
        bar.previous.close < price && bar.latest.close > price
    })?;
    Some(signal(
        bar,
        SignalKind::StandAside,
        vec![format!(
            "broke above strong resistance ({}): trend continuation risk",
            bar.ctx.format_price(level.price)
        )],
    ))
}

fn first_crossed(levels: &[Level], crossed: impl Fn(f64) -> bool) -> Option<&Level> {
    levels.iter().find(|level| crossed(level.price))
}
