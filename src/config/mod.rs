//! Process configuration and the hot-reloadable strategy settings.
//!
//! Process settings come from environment variables (optionally seeded from
//! `.env`). Strategy settings are served by a [`ConfigProvider`] that the
//! runners poll once per cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::{
    InstrumentKey, InvalidStrategyConfig, ParseInstrumentError, StrategyConfig, Timeframe,
    TradingMode,
};

pub const DEFAULT_SYMBOLS: [&str; 7] = [
    "USDJPY", "EURUSD", "GOLD", "BTCUSD", "GBPJPY", "ETHUSD", "XRPUSD",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Strategy(#[from] InvalidStrategyConfig),
    #[error(transparent)]
    Instrument(#[from] ParseInstrumentError),
    #[error("{name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("no instruments configured")]
    NoInstruments,
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deployment environment from `APP_ENV` (default `sandbox`).
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Process-level settings for the worker.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub instruments: Vec<InstrumentKey>,
    pub candle_count: usize,
    pub cooldown: Duration,
    pub min_candles: usize,
    pub fetch_timeout: Duration,
    pub settle_delay: Duration,
    pub settings_path: PathBuf,
    pub candle_dir: PathBuf,
    pub environment: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            candle_count: 300,
            cooldown: Duration::from_secs(300),
            min_candles: 50,
            fetch_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(5),
            settings_path: PathBuf::from("settings.json"),
            candle_dir: PathBuf::from("data/candles"),
            environment: "sandbox".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables keep their
    /// defaults; set but malformed ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let instruments = match lookup("INSTRUMENTS") {
            Some(raw) => parse_instruments(&raw)?,
            None => defaults.instruments,
        };

        Ok(Self {
            instruments,
            candle_count: parse_var(&lookup, "CANDLE_COUNT")?.unwrap_or(defaults.candle_count),
            cooldown: parse_var(&lookup, "SIGNAL_COOLDOWN_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cooldown),
            min_candles: parse_var(&lookup, "MIN_CANDLES")?.unwrap_or(defaults.min_candles),
            fetch_timeout: parse_var(&lookup, "FETCH_TIMEOUT_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            settle_delay: parse_var(&lookup, "SETTLE_DELAY_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.settle_delay),
            settings_path: lookup("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_path),
            candle_dir: lookup("CANDLE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.candle_dir),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

/// Every default symbol on every timeframe.
pub fn default_instruments() -> Vec<InstrumentKey> {
    DEFAULT_SYMBOLS
        .iter()
        .flat_map(|symbol| {
            Timeframe::ALL
                .iter()
                .map(move |tf| InstrumentKey::new(*symbol, *tf))
        })
        .collect()
}

/// Parse a comma separated `SYMBOL:TF` list such as `USDJPY:M1,EURUSD:H1`.
pub fn parse_instruments(raw: &str) -> Result<Vec<InstrumentKey>, ConfigError> {
    let instruments = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<InstrumentKey>, _>>()?;
    if instruments.is_empty() {
        return Err(ConfigError::NoInstruments);
    }
    Ok(instruments)
}

/// On-disk strategy settings. Pip distances fall back to the mode presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySettings {
    pub mode: TradingMode,
    #[serde(default)]
    pub lot_size: Option<f64>,
    #[serde(default)]
    pub stop_loss_pips: Option<f64>,
    #[serde(default)]
    pub take_profit_pips: Option<f64>,
    #[serde(default)]
    pub auto_trading: bool,
}

impl StrategySettings {
    pub fn into_config(self) -> Result<StrategyConfig, ConfigError> {
        let mut config = StrategyConfig::for_mode(self.mode).with_auto_trading(self.auto_trading);
        if let Some(lot_size) = self.lot_size {
            config = config.with_lot_size(lot_size);
        }
        if let Some(pips) = self.stop_loss_pips {
            config.stop_loss_pips = pips;
        }
        if let Some(pips) = self.take_profit_pips {
            config.take_profit_pips = pips;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Source of the strategy configuration, read once per evaluation cycle.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn snapshot(&self) -> StrategyConfig;
}

/// In-memory configuration shared between runners and an admin surface.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<StrategyConfig>>,
}

impl SharedConfig {
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
        })
    }

    /// Replace the configuration. An invalid update is rejected and the
    /// current value stays active.
    pub async fn update(&self, config: StrategyConfig) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "Rejected strategy configuration update");
            return Err(e.into());
        }
        info!(mode = %config.mode, lot_size = config.lot_size, "Strategy configuration updated");
        *self.inner.write().await = config;
        Ok(())
    }
}

#[async_trait]
impl ConfigProvider for SharedConfig {
    async fn snapshot(&self) -> StrategyConfig {
        self.inner.read().await.clone()
    }
}

/// Settings file re-read on every snapshot. A missing, unparseable or
/// invalid file leaves the last valid configuration in effect.
#[derive(Debug)]
pub struct JsonFileConfig {
    path: PathBuf,
    last_valid: RwLock<StrategyConfig>,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>, fallback: StrategyConfig) -> Self {
        Self {
            path: path.into(),
            last_valid: RwLock::new(fallback),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StrategyConfig, ConfigError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let settings: StrategySettings = serde_json::from_str(&raw)?;
        settings.into_config()
    }
}

#[async_trait]
impl ConfigProvider for JsonFileConfig {
    async fn snapshot(&self) -> StrategyConfig {
        match self.load().await {
            Ok(config) => {
                let mut last = self.last_valid.write().await;
                if *last != config {
                    info!(path = %self.path.display(), mode = %config.mode, "Reloaded strategy settings");
                    *last = config.clone();
                }
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file not found, using last valid settings");
                self.last_valid.read().await.clone()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring invalid settings file");
                self.last_valid.read().await.clone()
            }
        }
    }
}
