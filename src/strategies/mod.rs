//! Trading-mode policies that turn indicators and levels into signals.

pub mod daytrade;
pub mod evaluator;
pub mod scalp;

pub use daytrade::DaytradePolicy;
pub use evaluator::{policy_for, SignalPolicy};
pub use scalp::ScalpPolicy;
