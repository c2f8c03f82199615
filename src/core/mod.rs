//! Runners and their supervision

pub mod runner;
pub mod runtime;

pub use runner::*;
pub use runtime::*;
