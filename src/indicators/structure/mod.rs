//! Market structure: swing points, strong levels, trend lines, Fibonacci

pub mod fibonacci;
pub mod support_resistance;
pub mod swing;
pub mod trend_lines;

pub use fibonacci::*;
pub use support_resistance::*;
pub use swing::*;
pub use trend_lines::*;
