//! Prometheus metrics for the signal runners.

use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycles_failed_total: IntCounter,
    pub insufficient_data_total: IntCounter,
    pub signals_emitted_total: IntCounterVec,
    pub signals_suppressed_total: IntCounter,
    pub notifier_failures_total: IntCounter,
    pub active_runners: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("phantom_cycles_total", "Evaluation cycles run")?;
        let cycles_failed_total = IntCounter::new(
            "phantom_cycles_failed_total",
            "Evaluation cycles skipped because of an error",
        )?;
        let insufficient_data_total = IntCounter::new(
            "phantom_insufficient_data_total",
            "Cycles skipped for lack of candles",
        )?;
        let signals_emitted_total = IntCounterVec::new(
            Opts::new("phantom_signals_emitted_total", "Signals emitted to sinks"),
            &["kind"],
        )?;
        let signals_suppressed_total = IntCounter::new(
            "phantom_signals_suppressed_total",
            "Tradeable signals suppressed by the cooldown",
        )?;
        let notifier_failures_total = IntCounter::new(
            "phantom_notifier_failures_total",
            "Notification deliveries that failed",
        )?;
        let active_runners = Gauge::new("phantom_active_runners", "Runners currently polling")?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycles_failed_total.clone()))?;
        registry.register(Box::new(insufficient_data_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(signals_suppressed_total.clone()))?;
        registry.register(Box::new(notifier_failures_total.clone()))?;
        registry.register(Box::new(active_runners.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycles_failed_total,
            insufficient_data_total,
            signals_emitted_total,
            signals_suppressed_total,
            notifier_failures_total,
            active_runners,
        })
    }

    pub fn record_emitted(&self, kind: &str) {
        self.signals_emitted_total.with_label_values(&[kind]).inc();
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
