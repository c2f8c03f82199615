//! Phantom Alert signal engine.
//!
//! Polls candle windows per (symbol, timeframe), detects strong levels and
//! phantom traps, and classifies each window into a trading signal.

pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod strategies;
