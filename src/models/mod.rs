//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod instrument;
pub mod levels;
pub mod signal;
pub mod strategy;

pub use candle::{Candle, CandleSeries, SeriesError};
pub use indicators::{
    AtrSeries, BollingerSeries, EmaSeries, IchimokuSeries, IndicatorPlan, IndicatorSet,
    MacdSeries, RsiSeries, Series, StochasticSeries,
};
pub use instrument::{InstrumentKey, ParseInstrumentError, Timeframe};
pub use levels::{
    AnchorPoint, FibonacciLevel, Level, LevelRole, StrongLevels, SwingPoint, TrendLine,
    TrendLines,
};
pub use signal::{ProtectiveLevels, Signal, SignalKind, SignalOutput};
pub use strategy::{InvalidStrategyConfig, StrategyConfig, TradingMode};
