//! Trend indicators: EMA, Ichimoku

pub mod ema;
pub mod ichimoku;

pub use ema::*;
pub use ichimoku::*;
