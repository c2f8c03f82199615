//! Scripted collaborators for runner and runtime tests

#![allow(dead_code)]

use async_trait::async_trait;
use phantom_alert::config::SharedConfig;
use phantom_alert::core::{Collaborators, RunnerSettings};
use phantom_alert::models::{Candle, CandleSeries, InstrumentKey, StrategyConfig};
use phantom_alert::services::{
    CandleSource, ChartRenderer, ExecutionError, LoggingTradeExecutor, MarketDataError,
    NoopChartRenderer, Notifier, NotifierSet, NotifyError, TradeExecutor,
};
use phantom_alert::signals::{Evaluation, TradeOrder};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum Step {
    Candles(Vec<Candle>),
    Fail,
    Panic,
    Hang,
}

/// Plays back scripted steps, then keeps serving `fallback`.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    fallback: Vec<Candle>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(fallback: Vec<Candle>) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn then(self, step: Step) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandleSource for ScriptedSource {
    async fn fetch(
        &self,
        _key: &InstrumentKey,
        _count: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Candles(candles)) => Ok(CandleSeries::new(candles)?),
            Some(Step::Fail) => Err(MarketDataError::Connection("feed offline".to_string())),
            Some(Step::Panic) => panic!("feed exploded"),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(CandleSeries::empty())
            }
            None => Ok(CandleSeries::new(self.fallback.clone())?),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(String, Option<PathBuf>)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Option<PathBuf>)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, message: &str, image: Option<&Path>) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), image.map(Path::to_path_buf)));
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn notify(&self, _message: &str, _image: Option<&Path>) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery {
            notifier: "failing".to_string(),
            reason: "gateway down".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingExecutor {
    pub orders: Mutex<Vec<TradeOrder>>,
}

impl RecordingExecutor {
    pub fn orders(&self) -> Vec<TradeOrder> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeExecutor for RecordingExecutor {
    async fn execute(&self, order: &TradeOrder) -> Result<(), ExecutionError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }
}

/// Pretends to write a chart and remembers the labels it was asked for.
#[derive(Default)]
pub struct RecordingCharts {
    pub labels: Mutex<Vec<String>>,
}

impl RecordingCharts {
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChartRenderer for RecordingCharts {
    async fn render(
        &self,
        _series: &CandleSeries,
        _evaluation: &Evaluation,
        key: &InstrumentKey,
        label_prefix: &str,
    ) -> Option<PathBuf> {
        self.labels.lock().unwrap().push(label_prefix.to_string());
        Some(PathBuf::from(format!("/charts/{}_{}.png", key, label_prefix)))
    }
}

pub fn settings() -> RunnerSettings {
    RunnerSettings {
        interval: Duration::from_secs(60),
        candle_count: 300,
        min_candles: 50,
        cooldown: Duration::from_secs(300),
        fetch_timeout: Duration::from_secs(30),
        settle_delay: Duration::ZERO,
    }
}

pub fn collaborators(source: Arc<dyn CandleSource>, config: StrategyConfig) -> Collaborators {
    Collaborators {
        source,
        config: Arc::new(SharedConfig::new(config).unwrap()),
        charts: Arc::new(NoopChartRenderer),
        notifiers: NotifierSet::new(),
        executor: Arc::new(LoggingTradeExecutor),
        metrics: None,
    }
}

/// A scratch directory unique to this process and test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("phantom-alert-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
