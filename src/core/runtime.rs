//! Runner supervision: one task per instrument plus a signal aggregator.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::runner::{Collaborators, RunnerSettings, SignalRunner};
use crate::config::EngineConfig;
use crate::metrics::Metrics;
use crate::models::{InstrumentKey, SignalOutput};
use crate::services::SignalSink;
use crate::signals::{EngineParams, SignalEngine};

const OUTPUT_CHANNEL_CAPACITY: usize = 256;

pub struct SignalRuntime {
    config: EngineConfig,
    engine: SignalEngine,
    deps: Collaborators,
    sinks: Vec<Arc<dyn SignalSink>>,
}

impl SignalRuntime {
    pub fn new(config: EngineConfig, deps: Collaborators) -> Self {
        Self {
            config,
            engine: SignalEngine::default(),
            deps,
            sinks: Vec::new(),
        }
    }

    pub fn with_engine_params(mut self, params: EngineParams) -> Self {
        self.engine = SignalEngine::new(params);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn SignalSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Spawn a runner for every distinct instrument and the aggregator that
    /// fans their outputs out to the sinks.
    pub fn start(self) -> RuntimeHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (output_tx, output_rx) = mpsc::channel::<SignalOutput>(OUTPUT_CHANNEL_CAPACITY);

        let mut seen = HashSet::new();
        let mut runners = Vec::new();
        for key in &self.config.instruments {
            if !seen.insert(key.clone()) {
                warn!(instrument = %key, "Duplicate instrument ignored");
                continue;
            }
            let settings = RunnerSettings::for_timeframe(&self.config, key.timeframe);
            let runner = SignalRunner::new(
                key.clone(),
                settings,
                self.engine.clone(),
                self.deps.clone(),
                output_tx.clone(),
            );
            let handle = tokio::spawn(runner.run(stop_rx.clone()));
            runners.push((key.clone(), handle));
        }
        drop(output_tx);

        info!(runners = runners.len(), sinks = self.sinks.len(), "Signal runtime started");

        let aggregator = tokio::spawn(aggregate(output_rx, self.sinks, self.deps.metrics.clone()));

        RuntimeHandle {
            stop: stop_tx,
            runners,
            aggregator,
        }
    }
}

async fn aggregate(
    mut outputs: mpsc::Receiver<SignalOutput>,
    sinks: Vec<Arc<dyn SignalSink>>,
    metrics: Option<Arc<Metrics>>,
) {
    while let Some(output) = outputs.recv().await {
        if let Some(metrics) = &metrics {
            metrics.record_emitted(output.signal.kind.as_str());
        }
        for sink in &sinks {
            sink.publish(&output).await;
        }
    }
}

pub struct RuntimeHandle {
    stop: watch::Sender<bool>,
    runners: Vec<(InstrumentKey, JoinHandle<()>)>,
    aggregator: JoinHandle<()>,
}

impl RuntimeHandle {
    pub fn instruments(&self) -> Vec<InstrumentKey> {
        self.runners.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Request a stop, wait for every runner, then drain the aggregator.
    pub async fn shutdown(self) {
        self.stop.send_replace(true);

        let (keys, handles): (Vec<_>, Vec<_>) = self.runners.into_iter().unzip();
        for (key, result) in keys.iter().zip(join_all(handles).await) {
            if let Err(e) = result {
                error!(instrument = %key, error = %e, "Runner task ended abnormally");
            }
        }

        if let Err(e) = self.aggregator.await {
            error!(error = %e, "Aggregator task ended abnormally");
        }
        info!("Signal runtime stopped");
    }
}
