//! Integration tests for the reconnecting feed and the JSON candle files

use async_trait::async_trait;
use backon::ExponentialBuilder;
use phantom_alert::models::{Candle, InstrumentKey, Timeframe};
use phantom_alert::services::{
    CandleSource, FeedConnector, FeedSession, JsonFileConnector, MarketDataError,
    ReconnectingFeed,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common::{candle, rising_candles};
use crate::fakes::scratch_dir;

enum Reply {
    Candles(Vec<Candle>),
    Drop,
    Garbage,
    Hang,
}

/// Fails the first `failures` connects, then hands out sessions that play
/// back the shared script.
struct FlakyConnector {
    failures: AtomicUsize,
    connects: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<Reply>>>,
}

impl FlakyConnector {
    fn new(failures: usize, script: Vec<Reply>) -> (Self, Arc<AtomicUsize>) {
        let connects = Arc::new(AtomicUsize::new(0));
        let connector = Self {
            failures: AtomicUsize::new(failures),
            connects: connects.clone(),
            script: Arc::new(Mutex::new(script.into())),
        };
        (connector, connects)
    }
}

struct ScriptedSession {
    script: Arc<Mutex<VecDeque<Reply>>>,
}

#[async_trait]
impl FeedConnector for FlakyConnector {
    type Session = ScriptedSession;

    async fn connect(&self) -> Result<Self::Session, MarketDataError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(MarketDataError::Connection("refused".to_string()));
        }
        Ok(ScriptedSession {
            script: self.script.clone(),
        })
    }
}

#[async_trait]
impl FeedSession for ScriptedSession {
    async fn candles(
        &mut self,
        _key: &InstrumentKey,
        _count: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Candles(candles)) => Ok(candles),
            Some(Reply::Drop) => Err(MarketDataError::Connection("connection reset".to_string())),
            Some(Reply::Garbage) => Err(MarketDataError::Malformed("bad frame".to_string())),
            Some(Reply::Hang) => std::future::pending().await,
            None => Ok(Vec::new()),
        }
    }
}

fn quick_backoff(retries: usize) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(50))
        .with_max_times(retries)
}

fn key() -> InstrumentKey {
    InstrumentKey::new("EURUSD", Timeframe::M5)
}

#[tokio::test(start_paused = true)]
async fn test_session_is_reused_across_fetches() {
    let (connector, connects) = FlakyConnector::new(
        0,
        vec![
            Reply::Candles(rising_candles(5, 1.1, 0.001)),
            Reply::Candles(rising_candles(6, 1.1, 0.001)),
        ],
    );
    let feed = ReconnectingFeed::new(connector);
    assert!(!feed.is_connected().await);

    assert_eq!(feed.fetch(&key(), 300).await.unwrap().len(), 5);
    assert_eq!(feed.fetch(&key(), 300).await.unwrap().len(), 6);
    assert_eq!(connects.load(Ordering::SeqCst), 1);
    assert!(feed.is_connected().await);
}

#[tokio::test(start_paused = true)]
async fn test_connect_is_retried_with_backoff() {
    let (connector, connects) =
        FlakyConnector::new(2, vec![Reply::Candles(rising_candles(3, 1.1, 0.001))]);
    let feed = ReconnectingFeed::new(connector).with_backoff(quick_backoff(3));

    assert_eq!(feed.fetch(&key(), 300).await.unwrap().len(), 3);
    assert_eq!(connects.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_connect_gives_up_after_retries() {
    let (connector, connects) = FlakyConnector::new(10, Vec::new());
    let feed = ReconnectingFeed::new(connector).with_backoff(quick_backoff(2));

    let err = feed.fetch(&key(), 300).await.unwrap_err();
    assert!(matches!(err, MarketDataError::Connection(_)));
    assert_eq!(connects.load(Ordering::SeqCst), 3);
    assert!(!feed.is_connected().await);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_session_reconnects_on_next_fetch() {
    let (connector, connects) = FlakyConnector::new(
        0,
        vec![Reply::Drop, Reply::Candles(rising_candles(4, 1.1, 0.001))],
    );
    let feed = ReconnectingFeed::new(connector);

    let err = feed.fetch(&key(), 300).await.unwrap_err();
    assert!(err.is_connectivity());
    assert!(!feed.is_connected().await);

    assert_eq!(feed.fetch(&key(), 300).await.unwrap().len(), 4);
    assert_eq!(connects.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_request_drops_the_session() {
    let (connector, connects) = FlakyConnector::new(
        0,
        vec![Reply::Hang, Reply::Candles(rising_candles(4, 1.1, 0.001))],
    );
    let feed = ReconnectingFeed::new(connector).with_request_timeout(Duration::from_secs(5));

    let err = feed.fetch(&key(), 300).await.unwrap_err();
    assert!(matches!(err, MarketDataError::Timeout(d) if d == Duration::from_secs(5)));
    assert!(!feed.is_connected().await);

    assert_eq!(feed.fetch(&key(), 300).await.unwrap().len(), 4);
    assert_eq!(connects.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_hung_session_recovers_under_caller_timeout() {
    let (connector, connects) = FlakyConnector::new(
        0,
        vec![
            Reply::Hang,
            Reply::Hang,
            Reply::Candles(rising_candles(4, 1.1, 0.001)),
        ],
    );
    let feed = ReconnectingFeed::new(connector).with_request_timeout(Duration::from_secs(20));

    for _ in 0..2 {
        let result = tokio::time::timeout(Duration::from_secs(30), feed.fetch(&key(), 300)).await;
        assert!(matches!(result, Ok(Err(MarketDataError::Timeout(_)))));
    }
    let series = tokio::time::timeout(Duration::from_secs(30), feed.fetch(&key(), 300))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(connects.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_payload_errors_keep_the_session() {
    let (connector, connects) = FlakyConnector::new(
        0,
        vec![Reply::Garbage, Reply::Candles(rising_candles(2, 1.1, 0.001))],
    );
    let feed = ReconnectingFeed::new(connector);

    let err = feed.fetch(&key(), 300).await.unwrap_err();
    assert!(matches!(err, MarketDataError::Malformed(_)));
    assert!(!err.is_connectivity());
    assert!(feed.is_connected().await);
    assert_eq!(feed.fetch(&key(), 300).await.unwrap().len(), 2);
    assert_eq!(connects.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unordered_candles_are_rejected() {
    let candles = vec![
        candle(1, 1.1, 1.1, 1.1, 1.1, 1.0),
        candle(0, 1.1, 1.1, 1.1, 1.1, 1.0),
    ];
    let (connector, _) = FlakyConnector::new(0, vec![Reply::Candles(candles)]);
    let feed = ReconnectingFeed::new(connector);

    let err = feed.fetch(&key(), 300).await.unwrap_err();
    assert!(matches!(err, MarketDataError::Series(_)));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_share_one_session() {
    let (connector, connects) = FlakyConnector::new(
        0,
        vec![
            Reply::Candles(rising_candles(3, 1.1, 0.001)),
            Reply::Candles(rising_candles(3, 1.1, 0.001)),
        ],
    );
    let feed = Arc::new(ReconnectingFeed::new(connector));
    let other = InstrumentKey::new("USDJPY", Timeframe::H1);
    let first = key();

    let (a, b) = tokio::join!(feed.fetch(&first, 300), feed.fetch(&other, 300));
    assert_eq!(a.unwrap().len(), 3);
    assert_eq!(b.unwrap().len(), 3);
    assert_eq!(connects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_json_files_serve_the_latest_candles() {
    let dir = scratch_dir("candle-files");
    let candles = rising_candles(5, 150.0, 0.01);
    std::fs::write(
        dir.join("USDJPY_M15.json"),
        serde_json::to_string(&candles).unwrap(),
    )
    .unwrap();
    std::fs::write(dir.join("EURUSD_H1.json"), "[{\"open\": 1.0}]").unwrap();

    let feed = ReconnectingFeed::new(JsonFileConnector::new(&dir));

    let series = feed
        .fetch(&InstrumentKey::new("USDJPY", Timeframe::M15), 3)
        .await
        .unwrap();
    assert_eq!(series.candles(), &candles[2..]);

    let missing = feed
        .fetch(&InstrumentKey::new("GOLD", Timeframe::D1), 3)
        .await
        .unwrap();
    assert!(missing.is_empty());

    let err = feed
        .fetch(&InstrumentKey::new("EURUSD", Timeframe::H1), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Malformed(_)));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_missing_candle_directory_fails_to_connect() {
    let dir = scratch_dir("candle-missing").join("absent");
    let feed = ReconnectingFeed::new(JsonFileConnector::new(&dir)).with_backoff(
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(1))
            .with_max_times(1),
    );

    let err = feed
        .fetch(&InstrumentKey::new("USDJPY", Timeframe::M15), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Connection(_)));
}
