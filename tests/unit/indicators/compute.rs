//! Unit tests for plan-driven indicator computation

use phantom_alert::indicators::{compute_indicators, IndicatorError};
use phantom_alert::models::{IndicatorPlan, IndicatorSet};

use crate::common::{rising_candles, series};

fn full_plan() -> IndicatorPlan {
    IndicatorPlan::default()
        .with_rsi(14)
        .with_ema(9)
        .with_ema(20)
        .with_macd(12, 26, 9)
        .with_bollinger(20, 2.0)
        .with_stochastic(14, 3, 3)
        .with_atr(14)
        .with_ichimoku()
}

#[test]
fn test_compute_only_requested_indicators() {
    let data = series(rising_candles(60, 100.0, 0.5));
    let plan = IndicatorPlan::default().with_rsi(14);
    let set = compute_indicators(&data, &plan).unwrap();

    assert!(set.rsi.is_some());
    assert!(set.emas.is_empty());
    assert!(set.macd.is_none());
    assert!(set.bollinger.is_none());
    assert!(set.stochastic.is_none());
    assert!(set.atr.is_none());
    assert!(set.ichimoku.is_none());
}

#[test]
fn test_compute_full_plan_aligned_with_input() {
    let data = series(rising_candles(80, 100.0, 0.5));
    let set = IndicatorSet::compute(&data, &full_plan()).unwrap();

    assert_eq!(set.rsi.as_ref().unwrap().values.len(), 80);
    assert_eq!(set.emas.len(), 2);
    assert_eq!(set.ema(20).unwrap().values.len(), 80);
    assert_eq!(set.macd.as_ref().unwrap().histogram.len(), 80);
    assert_eq!(set.bollinger.as_ref().unwrap().upper.len(), 80);
    assert_eq!(set.stochastic.as_ref().unwrap().d.len(), 80);
    assert_eq!(set.atr.as_ref().unwrap().values.len(), 80);
    assert_eq!(set.ichimoku.as_ref().unwrap().chikou.len(), 80);
}

#[test]
fn test_short_input_is_uniformly_undefined() {
    let data = series(rising_candles(10, 100.0, 0.5));
    let set = compute_indicators(&data, &full_plan()).unwrap();

    assert!(set.rsi.as_ref().unwrap().values.iter().all(Option::is_none));
    assert!(set.ema(20).unwrap().values.iter().all(Option::is_none));
    assert!(set.macd.unwrap().macd.iter().all(Option::is_none));
    assert!(set.bollinger.unwrap().middle.iter().all(Option::is_none));
    assert!(set.stochastic.unwrap().k.iter().all(Option::is_none));
    assert!(set.atr.unwrap().values.iter().all(Option::is_none));
    assert!(set.ichimoku.unwrap().tenkan.iter().all(Option::is_none));
}

#[test]
fn test_empty_series_computes_empty_outputs() {
    let data = series(Vec::new());
    let set = compute_indicators(&data, &full_plan()).unwrap();
    assert!(set.rsi.unwrap().values.is_empty());
}

#[test]
fn test_invalid_parameters_are_errors() {
    let data = series(rising_candles(30, 100.0, 0.5));
    let plan = IndicatorPlan::default().with_rsi(0);
    assert_eq!(
        compute_indicators(&data, &plan),
        Err(IndicatorError::ZeroPeriod { indicator: "RSI" })
    );
}
