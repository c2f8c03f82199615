//! Scalp policy: Bollinger band excursions confirmed by a stochastic cross.

use tracing::warn;

use super::evaluator::SignalPolicy;
use crate::models::indicators::{latest, previous};
use crate::models::{IndicatorPlan, Signal, SignalKind, TradingMode};
use crate::signals::context::EvaluationContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalpPolicy {
    pub bollinger_period: u32,
    pub bollinger_std_dev: f64,
    pub stochastic: (u32, u32, u32),
    pub oversold: f64,
    pub overbought: f64,
    pub min_bars: usize,
}

impl Default for ScalpPolicy {
    fn default() -> Self {
        Self {
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            stochastic: (14, 3, 3),
            oversold: 25.0,
            overbought: 75.0,
            min_bars: 20,
        }
    }
}

impl SignalPolicy for ScalpPolicy {
    fn mode(&self) -> TradingMode {
        TradingMode::Scalp
    }

    fn min_history(&self) -> usize {
        self.min_bars
    }

    fn indicator_plan(&self) -> IndicatorPlan {
        let (k, d, smooth) = self.stochastic;
        IndicatorPlan::default()
            .with_bollinger(self.bollinger_period, self.bollinger_std_dev)
            .with_stochastic(k, d, smooth)
    }

    fn trap_gated(&self) -> bool {
        false
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<Signal> {
        if ctx.series.len() < self.min_history() {
            warn!(
                symbol = %ctx.symbol,
                bars = ctx.series.len(),
                required = self.min_history(),
                "Insufficient data for scalp policy"
            );
            return None;
        }

        let bands = ctx.indicators.bollinger.as_ref()?;
        let stochastic = ctx.indicators.stochastic.as_ref()?;
        let values = (
            latest(&bands.upper),
            latest(&bands.lower),
            latest(&stochastic.k),
            latest(&stochastic.d),
            previous(&stochastic.k),
            previous(&stochastic.d),
        );
        let (Some(upper), Some(lower), Some(k), Some(d), Some(prev_k), Some(prev_d)) = values
        else {
            warn!(symbol = %ctx.symbol, "Bollinger or stochastic undefined, skipping");
            return None;
        };

        let bar = ctx.latest()?;
        let close = bar.close;

        if close < lower && prev_k < prev_d && k > d && k < self.oversold {
            return Some(Signal::new(
                SignalKind::Buy,
                close,
                bar.timestamp,
                vec![
                    format!("close below lower band ({})", ctx.format_price(lower)),
                    format!("%K {:.1} crossed above %D {:.1}", k, d),
                    format!("%K below {:.0}", self.oversold),
                ],
            ));
        }

        if close > upper && prev_k > prev_d && k < d && k > self.overbought {
            return Some(Signal::new(
                SignalKind::Sell,
                close,
                bar.timestamp,
                vec![
                    format!("close above upper band ({})", ctx.format_price(upper)),
                    format!("%K {:.1} crossed below %D {:.1}", k, d),
                    format!("%K above {:.0}", self.overbought),
                ],
            ));
        }

        None
    }
}
