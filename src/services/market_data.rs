//! Candle sources and the shared upstream feed.
//!
//! Runners only see [`CandleSource`]. [`ReconnectingFeed`] wraps a single
//! upstream session behind a mutex so concurrent runners are serialised, and
//! drops the session on connectivity errors or an unanswered request so the
//! next fetch reconnects.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::models::{Candle, CandleSeries, InstrumentKey, SeriesError};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data connection failed: {0}")]
    Connection(String),
    #[error("candle fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed candle payload: {0}")]
    Malformed(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error("market data I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketDataError {
    /// Errors after which the upstream session should be re-established.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            MarketDataError::Connection(_) | MarketDataError::Timeout(_) | MarketDataError::Io(_)
        )
    }
}

/// Provides the most recent `count` candles for an instrument. "No data" is
/// an empty series, never an error.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch(&self, key: &InstrumentKey, count: usize)
        -> Result<CandleSeries, MarketDataError>;
}

/// Opens sessions to an upstream market-data service.
#[async_trait]
pub trait FeedConnector: Send + Sync {
    type Session: FeedSession;

    async fn connect(&self) -> Result<Self::Session, MarketDataError>;
}

#[async_trait]
pub trait FeedSession: Send {
    async fn candles(
        &mut self,
        key: &InstrumentKey,
        count: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

pub struct ReconnectingFeed<C: FeedConnector> {
    connector: C,
    session: Mutex<Option<C::Session>>,
    backoff: ExponentialBuilder,
    request_timeout: Duration,
}

impl<C: FeedConnector> ReconnectingFeed<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session: Mutex::new(None),
            backoff: ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(500))
                .with_max_delay(Duration::from_secs(10))
                .with_max_times(3),
            request_timeout: Duration::from_secs(20),
        }
    }

    pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }

    /// Bounds a single request on the session. Time spent queueing for the
    /// session is not counted.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn connect(&self) -> Result<C::Session, MarketDataError> {
        let session = (|| self.connector.connect())
            .retry(self.backoff.clone())
            .when(MarketDataError::is_connectivity)
            .notify(|err: &MarketDataError, delay: Duration| {
                warn!(error = %err, delay = ?delay, "Market data connect failed, retrying");
            })
            .await?;
        info!("Market data session established");
        Ok(session)
    }
}

#[async_trait]
impl<C> CandleSource for ReconnectingFeed<C>
where
    C: FeedConnector,
    C::Session: Send,
{
    async fn fetch(
        &self,
        key: &InstrumentKey,
        count: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        let mut guard = self.session.lock().await;
        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let Some(session) = guard.as_mut() else {
            return Err(MarketDataError::Connection("session unavailable".to_string()));
        };

        let reply = timeout(self.request_timeout, session.candles(key, count))
            .await
            .unwrap_or(Err(MarketDataError::Timeout(self.request_timeout)));
        match reply {
            Ok(candles) => {
                debug!(instrument = %key, candles = candles.len(), "Fetched candles");
                Ok(CandleSeries::new(candles)?)
            }
            Err(e) if e.is_connectivity() => {
                warn!(instrument = %key, error = %e, "Dropping market data session");
                *guard = None;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

/// Reads `<dir>/<SYMBOL>_<TF>.json`, each a JSON array of candles.
#[derive(Debug, Clone)]
pub struct JsonFileConnector {
    dir: PathBuf,
}

impl JsonFileConnector {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FeedConnector for JsonFileConnector {
    type Session = JsonFileSession;

    async fn connect(&self) -> Result<Self::Session, MarketDataError> {
        let metadata = tokio::fs::metadata(&self.dir).await.map_err(|e| {
            MarketDataError::Connection(format!("{}: {}", self.dir.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(MarketDataError::Connection(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }
        Ok(JsonFileSession {
            dir: self.dir.clone(),
        })
    }
}

#[derive(Debug)]
pub struct JsonFileSession {
    dir: PathBuf,
}

impl JsonFileSession {
    pub fn file_for(&self, key: &InstrumentKey) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", key.symbol, key.timeframe))
    }
}

#[async_trait]
impl FeedSession for JsonFileSession {
    async fn candles(
        &mut self,
        key: &InstrumentKey,
        count: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let path = self.file_for(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No candle file, returning empty series");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut candles: Vec<Candle> = serde_json::from_str(&raw)
            .map_err(|e| MarketDataError::Malformed(format!("{}: {}", path.display(), e)))?;
        if candles.len() > count {
            candles.drain(..candles.len() - count);
        }
        Ok(candles)
    }
}
