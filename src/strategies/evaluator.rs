//! Policy interface shared by the trading modes.

use crate::models::{IndicatorPlan, Signal, TradingMode};
use crate::signals::context::EvaluationContext;

use super::daytrade::DaytradePolicy;
use super::scalp::ScalpPolicy;

/// A trading-mode specific decision policy.
///
/// For a trap-gated policy `evaluate` runs only after the trap gate found
/// nothing. It returns `None` when no rule fires or the window is too short.
pub trait SignalPolicy: Send + Sync {
    fn mode(&self) -> TradingMode;

    /// Bars required before `evaluate` looks at anything.
    fn min_history(&self) -> usize;

    /// Indicators the policy reads from the context.
    fn indicator_plan(&self) -> IndicatorPlan;

    /// Whether phantom-trap detection runs ahead of this policy.
    fn trap_gated(&self) -> bool {
        true
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<Signal>;
}

/// Policy selected by the configured trading mode.
pub fn policy_for(mode: TradingMode) -> Box<dyn SignalPolicy> {
    match mode {
        TradingMode::Daytrade => Box::new(DaytradePolicy::default()),
        TradingMode::Scalp => Box::new(ScalpPolicy::default()),
    }
}
