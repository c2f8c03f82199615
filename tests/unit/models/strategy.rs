//! Unit tests for trading mode and strategy configuration

use phantom_alert::models::{
    InvalidStrategyConfig, Signal, SignalKind, StrategyConfig, TradingMode,
};

use crate::common::ts;

#[test]
fn test_mode_presets() {
    let scalp = StrategyConfig::for_mode(TradingMode::Scalp);
    assert_eq!((scalp.stop_loss_pips, scalp.take_profit_pips), (10.0, 15.0));

    let daytrade = StrategyConfig::default();
    assert_eq!(daytrade.mode, TradingMode::Daytrade);
    assert_eq!((daytrade.stop_loss_pips, daytrade.take_profit_pips), (40.0, 80.0));
    assert_eq!(daytrade.lot_size, 0.01);
    assert!(!daytrade.auto_trading);
}

#[test]
fn test_mode_parsing_accepts_aliases() {
    assert_eq!("Scalp".parse::<TradingMode>(), Ok(TradingMode::Scalp));
    assert_eq!("day_trade".parse::<TradingMode>(), Ok(TradingMode::Daytrade));
    assert_eq!("day-trade".parse::<TradingMode>(), Ok(TradingMode::Daytrade));
    assert_eq!(
        "swing".parse::<TradingMode>(),
        Err(InvalidStrategyConfig::UnknownMode("swing".to_string()))
    );
}

#[test]
fn test_config_deserializes_with_defaults() {
    let json = r#"{"mode":"day_trade","lot_size":0.1,"stop_loss_pips":30,"take_profit_pips":60}"#;
    let config: StrategyConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.mode, TradingMode::Daytrade);
    assert_eq!(config.lot_size, 0.1);
    assert!(!config.auto_trading);
}

#[test]
fn test_validation_rejects_non_positive_values() {
    let config = StrategyConfig::default().with_lot_size(0.0);
    assert_eq!(config.validate(), Err(InvalidStrategyConfig::LotSize(0.0)));

    let mut config = StrategyConfig::default();
    config.stop_loss_pips = -5.0;
    assert_eq!(config.validate(), Err(InvalidStrategyConfig::StopLoss(-5.0)));

    let mut config = StrategyConfig::default();
    config.take_profit_pips = f64::INFINITY;
    assert!(config.validate().is_err());

    assert!(StrategyConfig::default().with_auto_trading(true).validate().is_ok());
}

#[test]
fn test_signal_kind_classification() {
    assert!(SignalKind::Buy.is_tradeable());
    assert!(SignalKind::Sell.is_tradeable());
    assert!(!SignalKind::StandAside.is_tradeable());
    assert!(!SignalKind::TrapAlertBuy.is_tradeable());
    assert!(SignalKind::TrapAlertSell.is_trap());
    assert!(!SignalKind::None.is_trap());
    assert_eq!(
        serde_json::to_string(&SignalKind::TrapAlertBuy).unwrap(),
        "\"TRAP_ALERT_BUY\""
    );
    assert_eq!(SignalKind::StandAside.to_string(), "STAND_ASIDE");
}

#[test]
fn test_signal_describe() {
    let signal = Signal::new(
        SignalKind::Buy,
        1.1,
        ts(0),
        vec!["a".to_string(), "b".to_string()],
    );
    assert_eq!(signal.describe(), "a, b");
    let empty = Signal::new(SignalKind::None, 1.1, ts(0), Vec::new());
    assert_eq!(empty.describe(), "-");
    assert_eq!(Signal::none(1.1, ts(0), "no actionable signal").reasons.len(), 1);
}
