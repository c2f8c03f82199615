//! Integration tests for the settings file provider

use phantom_alert::config::{ConfigProvider, JsonFileConfig};
use phantom_alert::models::{StrategyConfig, TradingMode};

use crate::fakes::scratch_dir;

#[tokio::test]
async fn test_settings_file_is_reread_every_snapshot() {
    let dir = scratch_dir("settings-reload");
    let path = dir.join("settings.json");
    let provider = JsonFileConfig::new(&path, StrategyConfig::default());

    // missing file: fallback
    assert_eq!(provider.snapshot().await, StrategyConfig::default());

    std::fs::write(&path, r#"{"mode":"scalp","lot_size":0.05}"#).unwrap();
    let config = provider.snapshot().await;
    assert_eq!(config.mode, TradingMode::Scalp);
    assert_eq!(config.lot_size, 0.05);
    assert_eq!(config.stop_loss_pips, 10.0);

    std::fs::write(&path, r#"{"mode":"daytrade","auto_trading":true}"#).unwrap();
    let config = provider.snapshot().await;
    assert_eq!(config.mode, TradingMode::Daytrade);
    assert!(config.auto_trading);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_bad_settings_keep_last_valid() {
    let dir = scratch_dir("settings-invalid");
    let path = dir.join("settings.json");
    let provider = JsonFileConfig::new(&path, StrategyConfig::default());
    assert_eq!(provider.path(), path.as_path());

    std::fs::write(&path, r#"{"mode":"scalp"}"#).unwrap();
    assert_eq!(provider.snapshot().await.mode, TradingMode::Scalp);

    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(provider.snapshot().await.mode, TradingMode::Scalp);

    std::fs::write(&path, r#"{"mode":"daytrade","lot_size":-1}"#).unwrap();
    assert_eq!(provider.snapshot().await.mode, TradingMode::Scalp);

    std::fs::write(&path, r#"{"mode":"swing"}"#).unwrap();
    assert_eq!(provider.snapshot().await.mode, TradingMode::Scalp);

    std::fs::remove_file(&path).unwrap();
    assert_eq!(provider.snapshot().await.mode, TradingMode::Scalp);

    std::fs::remove_dir_all(&dir).unwrap();
}
