//! Per-instrument polling loop.
//!
//! One [`SignalRunner`] owns one (symbol, timeframe) pair: it fetches a fresh
//! candle window every interval, evaluates it, applies the tradeable-signal
//! cooldown and hands results to the aggregator channel. Errors and panics
//! inside a cycle are logged and the cycle is skipped; the loop itself only
//! ends on a stop request.

use chrono::Utc;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigProvider, EngineConfig};
use crate::indicators::IndicatorError;
use crate::metrics::Metrics;
use crate::models::{
    CandleSeries, InstrumentKey, Signal, SignalOutput, StrategyConfig, Timeframe,
};
use crate::services::{
    notification_message, should_notify, CandleSource, ChartRenderer, MarketDataError,
    NotifierSet, TradeExecutor,
};
use crate::signals::{Evaluation, SignalEngine, StopLossTakeProfit, TradeOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Starting,
    Polling,
    Cooldown,
    Stopped,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error("signal channel closed")]
    ChannelClosed,
    #[error("evaluation panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerSettings {
    /// Polling cadence, normally the timeframe's bar length.
    pub interval: Duration,
    pub candle_count: usize,
    pub min_candles: usize,
    pub cooldown: Duration,
    pub fetch_timeout: Duration,
    pub settle_delay: Duration,
}

impl RunnerSettings {
    pub fn for_timeframe(config: &EngineConfig, timeframe: Timeframe) -> Self {
        Self {
            interval: timeframe.interval(),
            candle_count: config.candle_count,
            min_candles: config.min_candles,
            cooldown: config.cooldown,
            fetch_timeout: config.fetch_timeout,
            settle_delay: config.settle_delay,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Shared collaborators handed to every runner.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn CandleSource>,
    pub config: Arc<dyn ConfigProvider>,
    pub charts: Arc<dyn ChartRenderer>,
    pub notifiers: NotifierSet,
    pub executor: Arc<dyn TradeExecutor>,
    pub metrics: Option<Arc<Metrics>>,
}

impl Collaborators {
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// What a single cycle ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Too few candles; an informational status was emitted.
    InsufficientData { bars: usize },
    Emitted(SignalOutput),
    /// Tradeable signal inside the cooldown window; nothing was emitted.
    Suppressed(Signal),
    /// A stop request arrived while the cycle was in flight.
    Stopped,
}

pub struct SignalRunner {
    key: InstrumentKey,
    settings: RunnerSettings,
    engine: SignalEngine,
    deps: Collaborators,
    outputs: mpsc::Sender<SignalOutput>,
    state: watch::Sender<RunnerState>,
    last_tradeable: Option<Instant>,
}

impl SignalRunner {
    pub fn new(
        key: InstrumentKey,
        settings: RunnerSettings,
        engine: SignalEngine,
        deps: Collaborators,
        outputs: mpsc::Sender<SignalOutput>,
    ) -> Self {
        let (state, _) = watch::channel(RunnerState::Starting);
        Self {
            key,
            settings,
            engine,
            deps,
            outputs,
            state,
            last_tradeable: None,
        }
    }

    pub fn key(&self) -> &InstrumentKey {
        &self.key
    }

    pub fn state(&self) -> RunnerState {
        *self.state.borrow()
    }

    /// Observe state transitions from outside the task.
    pub fn subscribe_state(&self) -> watch::Receiver<RunnerState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: RunnerState) {
        self.state.send_replace(state);
    }

    /// Poll until `stop` becomes true or its sender is dropped.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        if let Some(metrics) = &self.deps.metrics {
            metrics.active_runners.inc();
        }
        info!(instrument = %self.key, interval = ?self.settings.interval, "Runner starting");

        let stopped = wait_or_stop(&mut stop, self.settings.settle_delay).await;
        if !stopped {
            self.set_state(RunnerState::Polling);
            loop {
                self.refresh_cooldown();
                let outcome = AssertUnwindSafe(self.run_cycle(&stop)).catch_unwind().await;
                match outcome {
                    Ok(Ok(outcome)) => self.record(&outcome),
                    Ok(Err(e)) => self.record_failure(&e),
                    Err(panic) => self.record_failure(&EngineError::Panicked(panic_message(&*panic))),
                }

                if wait_or_stop(&mut stop, self.settings.interval).await {
                    break;
                }
            }
        }

        self.set_state(RunnerState::Stopped);
        if let Some(metrics) = &self.deps.metrics {
            metrics.active_runners.dec();
        }
        info!(instrument = %self.key, "Runner stopped");
    }

    /// Leave the cooldown state once the window has elapsed.
    fn refresh_cooldown(&self) {
        if self.state() == RunnerState::Cooldown && !self.in_cooldown() {
            self.set_state(RunnerState::Polling);
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_tradeable
            .is_some_and(|at| at.elapsed() < self.settings.cooldown)
    }

    /// One fetch-evaluate-emit pass.
    pub async fn run_cycle(
        &mut self,
        stop: &watch::Receiver<bool>,
    ) -> Result<CycleOutcome, EngineError> {
        if let Some(metrics) = &self.deps.metrics {
            metrics.cycles_total.inc();
        }
        let config = self.deps.config.snapshot().await;

        let series = timeout(
            self.settings.fetch_timeout,
            self.deps.source.fetch(&self.key, self.settings.candle_count),
        )
        .await
        .map_err(|_| MarketDataError::Timeout(self.settings.fetch_timeout))??;

        if *stop.borrow() {
            debug!(instrument = %self.key, "Stop requested during fetch, discarding result");
            return Ok(CycleOutcome::Stopped);
        }

        if series.len() < self.settings.min_candles {
            return self.report_insufficient(&series).await;
        }

        let evaluation = self
            .engine
            .evaluate_mode(&self.key.symbol, &series, config.mode)?;
        let Some(latest) = series.latest() else {
            return self.report_insufficient(&series).await;
        };
        let signal = evaluation.signal.clone().unwrap_or_else(|| {
            Signal::none(latest.close, latest.timestamp, "no actionable signal")
        });

        if signal.kind.is_tradeable() {
            if self.in_cooldown() {
                info!(
                    instrument = %self.key,
                    kind = %signal.kind,
                    "Tradeable signal within cooldown, suppressed"
                );
                if let Some(metrics) = &self.deps.metrics {
                    metrics.signals_suppressed_total.inc();
                }
                return Ok(CycleOutcome::Suppressed(signal));
            }
            return self
                .emit_tradeable(signal, &series, &evaluation, &config, stop)
                .await;
        }

        self.emit_informational(signal, &series, &evaluation, &config, stop)
            .await
    }

    async fn report_insufficient(
        &self,
        series: &CandleSeries,
    ) -> Result<CycleOutcome, EngineError> {
        warn!(
            instrument = %self.key,
            bars = series.len(),
            required = self.settings.min_candles,
            "Insufficient candles, skipping cycle"
        );
        if let Some(metrics) = &self.deps.metrics {
            metrics.insufficient_data_total.inc();
        }
        let (price, timestamp) = series
            .latest()
            .map(|c| (c.close, c.timestamp))
            .unwrap_or_else(|| (0.0, Utc::now()));
        let output =
            SignalOutput::informational(self.key.clone(), Signal::none(price, timestamp, "insufficient data"));
        self.send(output).await?;
        Ok(CycleOutcome::InsufficientData { bars: series.len() })
    }

    async fn emit_tradeable(
        &mut self,
        signal: Signal,
        series: &CandleSeries,
        evaluation: &Evaluation,
        config: &StrategyConfig,
        stop: &watch::Receiver<bool>,
    ) -> Result<CycleOutcome, EngineError> {
        let symbol = self.key.symbol.clone();
        let chart = self
            .deps
            .charts
            .render(series, evaluation, &self.key, signal.kind.as_str())
            .await;

        let mut output = SignalOutput::informational(self.key.clone(), signal.clone())
            .as_tradeable()
            .with_chart(chart)
            .with_outlook(evaluation.outlook.clone());
        if let Some(levels) = StopLossTakeProfit::calculate(signal.kind, signal.price, &symbol, config) {
            output = output.with_protective(levels);
        }

        if *stop.borrow() {
            return Ok(CycleOutcome::Stopped);
        }

        self.send(output.clone()).await?;
        self.last_tradeable = Some(Instant::now());
        self.set_state(RunnerState::Cooldown);
        info!(
            instrument = %self.key,
            kind = %signal.kind,
            price = signal.price,
            reasons = %signal.describe(),
            "Tradeable signal emitted"
        );

        self.notify(&output, config).await;

        if config.auto_trading {
            if let Some(order) = TradeOrder::from_signal(&symbol, signal.kind, signal.price, config) {
                if let Err(e) = self.deps.executor.execute(&order).await {
                    error!(instrument = %self.key, error = %e, "Trade execution failed");
                }
            }
        }

        Ok(CycleOutcome::Emitted(output))
    }

    async fn emit_informational(
        &self,
        signal: Signal,
        series: &CandleSeries,
        evaluation: &Evaluation,
        config: &StrategyConfig,
        stop: &watch::Receiver<bool>,
    ) -> Result<CycleOutcome, EngineError> {
        let is_trap = signal.kind.is_trap();
        let chart = if is_trap {
            self.deps
                .charts
                .render(series, evaluation, &self.key, signal.kind.as_str())
                .await
        } else {
            None
        };
        let output = SignalOutput::informational(self.key.clone(), signal)
            .with_chart(chart)
            .with_outlook(evaluation.outlook.clone());

        if *stop.borrow() {
            return Ok(CycleOutcome::Stopped);
        }

        self.send(output.clone()).await?;
        debug!(instrument = %self.key, kind = %output.signal.kind, "Status emitted");

        if is_trap {
            self.notify(&output, config).await;
        }
        Ok(CycleOutcome::Emitted(output))
    }

    async fn notify(&self, output: &SignalOutput, config: &StrategyConfig) {
        if self.deps.notifiers.is_empty() {
            return;
        }
        if !should_notify(config.mode, self.key.timeframe) {
            info!(instrument = %self.key, "Scalp M1 notification skipped");
            return;
        }
        let message = notification_message(output);
        let failures = self
            .deps
            .notifiers
            .notify_all(&message, output.chart.as_deref())
            .await;
        if failures > 0 {
            if let Some(metrics) = &self.deps.metrics {
                metrics.notifier_failures_total.inc_by(failures as u64);
            }
        }
    }

    async fn send(&self, output: SignalOutput) -> Result<(), EngineError> {
        self.outputs
            .send(output)
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    fn record(&self, outcome: &CycleOutcome) {
        if let CycleOutcome::Emitted(output) = outcome {
            debug!(
                instrument = %self.key,
                kind = %output.signal.kind,
                tradeable = output.tradeable,
                "Cycle complete"
            );
        }
    }

    fn record_failure(&self, e: &EngineError) {
        error!(instrument = %self.key, error = %e, "Cycle failed, skipping");
        if let Some(metrics) = &self.deps.metrics {
            metrics.cycles_failed_total.inc();
        }
    }
}

/// Sleep for `duration` unless a stop is requested first. Returns true when
/// the runner should stop.
async fn wait_or_stop(stop: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if *stop.borrow_and_update() {
            return true;
        }
        tokio::select! {
            _ = sleep_until(deadline) => return false,
            changed = stop.changed() => {
                if changed.is_err() {
                    return true;
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
