//! Decision pipeline for one candle window: indicators, levels, trap gate,
//! then the mode policy.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::context::EvaluationContext;
use super::projection::project_outlook;
use super::trap::{detect_phantom_trap, TrapParams};
use crate::indicators::structure::{
    find_fibonacci_levels, find_strong_levels, find_trend_lines, LevelParams,
};
use crate::indicators::{compute_indicators, IndicatorError};
use crate::models::{
    CandleSeries, FibonacciLevel, IndicatorSet, Signal, StrongLevels, TradingMode, TrendLines,
};
use crate::strategies::evaluator::{policy_for, SignalPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub levels: LevelParams,
    pub trap: TrapParams,
    /// Swing separation used for trend-line anchors.
    pub trend_line_separation: usize,
    /// Trailing bars spanned by the Fibonacci retracement.
    pub fibonacci_window: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            levels: LevelParams::default(),
            trap: TrapParams::default(),
            trend_line_separation: 10,
            fibonacci_window: 100,
        }
    }
}

/// Everything derived from one window. `signal` is `None` when neither the
/// trap gate nor the policy fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub signal: Option<Signal>,
    pub indicators: IndicatorSet,
    pub levels: StrongLevels,
    pub trend_lines: TrendLines,
    pub fibonacci: Vec<FibonacciLevel>,
    pub outlook: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    params: EngineParams,
}

impl SignalEngine {
    pub fn new(params: EngineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Evaluate with the policy registered for `mode`.
    pub fn evaluate_mode(
        &self,
        symbol: &str,
        series: &CandleSeries,
        mode: TradingMode,
    ) -> Result<Evaluation, IndicatorError> {
        self.evaluate(symbol, series, policy_for(mode).as_ref())
    }

    /// Run the trap gate when the policy asks for it, then `policy` if no
    /// trap fired.
    pub fn evaluate(
        &self,
        symbol: &str,
        series: &CandleSeries,
        policy: &dyn SignalPolicy,
    ) -> Result<Evaluation, IndicatorError> {
        let indicators = compute_indicators(series, &policy.indicator_plan())?;
        let levels = find_strong_levels(series, symbol, &self.params.levels);

        let ctx = EvaluationContext::new(symbol, series, &indicators, &levels);
        let trap = if policy.trap_gated() {
            detect_phantom_trap(&ctx, &self.params.trap)
        } else {
            None
        };
        let signal = match trap {
            Some(trap) => {
                info!(
                    symbol = %symbol,
                    kind = %trap.kind,
                    reasons = %trap.describe(),
                    "Trap gate fired, skipping policy rules"
                );
                Some(trap)
            }
            None => policy.evaluate(&ctx),
        };

        let trend_lines = find_trend_lines(series, self.params.trend_line_separation);
        let fibonacci = find_fibonacci_levels(series, self.params.fibonacci_window);
        let outlook = project_outlook(symbol, series, &levels, &trend_lines, &fibonacci);

        debug!(
            symbol = %symbol,
            mode = %policy.mode(),
            signal = ?signal.as_ref().map(|s| s.kind),
            support_levels = levels.support.len(),
            resistance_levels = levels.resistance.len(),
            "Evaluation complete"
        );

        Ok(Evaluation {
            signal,
            indicators,
            levels,
            trend_lines,
            fibonacci,
            outlook,
        })
    }
}
