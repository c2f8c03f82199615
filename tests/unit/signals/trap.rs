//! Unit tests for the phantom trap gate

use phantom_alert::indicators::{find_strong_levels, LevelParams};
use phantom_alert::models::{
    Candle, CandleSeries, IndicatorSet, Level, LevelRole, Signal, SignalKind, StrongLevels,
};
use phantom_alert::signals::{detect_phantom_trap, EvaluationContext, TrapParams};

use crate::common::{candle, resistance_breakout_candles, series};

fn level(price: f64, role: LevelRole) -> Level {
    Level {
        price,
        role,
        strength: 3,
        touches: vec![price; 3],
    }
}

fn trap_for(data: &CandleSeries, symbol: &str, levels: &StrongLevels) -> Option<Signal> {
    let indicators = IndicatorSet::new();
    let ctx = EvaluationContext::new(symbol, data, &indicators, levels);
    detect_phantom_trap(&ctx, &TrapParams::default())
}

/// 20 quiet bars closing at `prev_close`, then the latest bar.
fn breakdown_candles(prev_close: f64, latest_close: f64, latest_volume: f64) -> Vec<Candle> {
    let mut candles: Vec<Candle> = (0..20)
        .map(|i| candle(i, prev_close, prev_close + 0.0005, prev_close - 0.0005, prev_close, 1000.0))
        .collect();
    candles.push(candle(
        20,
        prev_close,
        prev_close + 0.0002,
        latest_close - 0.0002,
        latest_close,
        latest_volume,
    ));
    candles
}

#[test]
fn test_low_volume_breakout_is_a_sell_trap() {
    let data = series(resistance_breakout_candles(500.0));
    let levels = find_strong_levels(&data, "USDJPY", &LevelParams::default());
    let signal = trap_for(&data, "USDJPY", &levels).unwrap();

    assert_eq!(signal.kind, SignalKind::TrapAlertSell);
    assert_eq!(signal.price, 150.010);
    assert_eq!(signal.timestamp, data.latest().unwrap().timestamp);
    assert_eq!(
        signal.reasons,
        vec![
            "phantom breakout above strong resistance (150.000)".to_string(),
            "volume 500 below 80% of 20-bar average 1000".to_string(),
        ]
    );
}

#[test]
fn test_confirmed_breakout_is_not_a_trap() {
    let data = series(resistance_breakout_candles(1000.0));
    let levels = find_strong_levels(&data, "USDJPY", &LevelParams::default());
    assert!(trap_for(&data, "USDJPY", &levels).is_none());
}

#[test]
fn test_volume_above_threshold_is_not_a_trap() {
    let data = series(resistance_breakout_candles(850.0));
    let levels = find_strong_levels(&data, "USDJPY", &LevelParams::default());
    assert!(trap_for(&data, "USDJPY", &levels).is_none());
}

#[test]
fn test_low_volume_breakdown_is_a_buy_trap() {
    let data = series(breakdown_candles(1.1005, 1.0995, 100.0));
    let levels = StrongLevels {
        support: vec![level(1.1000, LevelRole::Support)],
        resistance: Vec::new(),
    };
    let signal = trap_for(&data, "EURUSD", &levels).unwrap();

    assert_eq!(signal.kind, SignalKind::TrapAlertBuy);
    assert_eq!(
        signal.reasons,
        vec![
            "phantom breakdown below strong support (1.10000)".to_string(),
            "volume 100 below 80% of 20-bar average 1000".to_string(),
        ]
    );
}

#[test]
fn test_first_crossed_level_wins() {
    let data = series(breakdown_candles(1.1005, 1.0990, 100.0));
    let levels = StrongLevels {
        support: vec![level(1.0995, LevelRole::Support), level(1.1000, LevelRole::Support)],
        resistance: Vec::new(),
    };
    let signal = trap_for(&data, "EURUSD", &levels).unwrap();
    assert_eq!(signal.reasons[0], "phantom breakdown below strong support (1.09950)");
}

#[test]
fn test_low_volume_without_a_crossing_is_quiet() {
    let data = series(breakdown_candles(1.1005, 1.1003, 100.0));
    let levels = StrongLevels {
        support: vec![level(1.1000, LevelRole::Support)],
        resistance: vec![level(1.1010, LevelRole::Resistance)],
    };
    assert!(trap_for(&data, "EURUSD", &levels).is_none());
}

#[test]
fn test_needs_a_full_volume_baseline() {
    let mut candles = breakdown_candles(1.1005, 1.0995, 100.0);
    candles.remove(0);
    let data = series(
        candles
            .into_iter()
            .enumerate()
            .map(|(i, c)| candle(i, c.open, c.high, c.low, c.close, c.volume))
            .collect(),
    );
    let levels = StrongLevels {
        support: vec![level(1.1000, LevelRole::Support)],
        resistance: Vec::new(),
    };
    assert_eq!(data.len(), 20);
    assert!(trap_for(&data, "EURUSD", &levels).is_none());
}
