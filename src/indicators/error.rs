use thiserror::Error;

/// Invalid indicator parameters. Short input is never an error: it yields
/// undefined values instead.
#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator} period must be at least 1")]
    ZeroPeriod { indicator: &'static str },
    #[error("MACD fast period ({fast}) must be shorter than slow period ({slow})")]
    MacdPeriods { fast: u32, slow: u32 },
    #[error("Bollinger deviation multiplier must be positive and finite, got {0}")]
    Deviation(f64),
}

pub(crate) fn ensure_period(indicator: &'static str, period: u32) -> Result<usize, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::ZeroPeriod { indicator });
    }
    Ok(period as usize)
}
