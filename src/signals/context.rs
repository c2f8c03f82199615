//! Read-only inputs shared by the trap gate and the strategy policies.

use crate::models::{Candle, CandleSeries, IndicatorSet, StrongLevels};

/// Everything a decision rule may look at for one evaluation cycle.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub symbol: &'a str,
    pub series: &'a CandleSeries,
    pub indicators: &'a IndicatorSet,
    pub levels: &'a StrongLevels,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        symbol: &'a str,
        series: &'a CandleSeries,
        indicators: &'a IndicatorSet,
        levels: &'a StrongLevels,
    ) -> Self {
        Self {
            symbol,
            series,
            indicators,
            levels,
        }
    }

    pub fn latest(&self) -> Option<&'a Candle> {
        self.series.latest()
    }

    pub fn previous(&self) -> Option<&'a Candle> {
        self.series.previous()
    }

    pub fn format_price(&self, price: f64) -> String {
        format_price(self.symbol, price)
    }
}

/// Decimal places used when quoting prices of `symbol`.
pub fn price_decimals(symbol: &str) -> usize {
    if symbol.to_ascii_uppercase().contains("JPY") {
        3
    } else {
        5
    }
}

pub fn format_price(symbol: &str, price: f64) -> String {
    format!("{:.*}", price_decimals(symbol), price)
}
