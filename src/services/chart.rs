//! Chart rendering seam.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::models::{CandleSeries, InstrumentKey};
use crate::signals::Evaluation;

/// Renders a chart for a tradeable or trap signal and returns where it was
/// written. `None` means no chart is available; rendering never fails a cycle.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(
        &self,
        series: &CandleSeries,
        evaluation: &Evaluation,
        key: &InstrumentKey,
        label_prefix: &str,
    ) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChartRenderer;

#[async_trait]
impl ChartRenderer for NoopChartRenderer {
    async fn render(
        &self,
        _series: &CandleSeries,
        _evaluation: &Evaluation,
        _key: &InstrumentKey,
        _label_prefix: &str,
    ) -> Option<PathBuf> {
        None
    }
}
