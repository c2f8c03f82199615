//! Downstream consumers of emitted signals.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{InstrumentKey, SignalOutput};

/// Receives every emitted signal, tradeable or informational.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn publish(&self, output: &SignalOutput);
}

/// Latest output per instrument, overwritten on every publish.
#[derive(Debug, Default)]
pub struct InMemorySignalBoard {
    latest: RwLock<HashMap<InstrumentKey, SignalOutput>>,
}

impl InMemorySignalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &InstrumentKey) -> Option<SignalOutput> {
        self.latest.read().await.get(key).cloned()
    }

    /// All entries ordered by instrument.
    pub async fn snapshot(&self) -> Vec<SignalOutput> {
        let mut entries: Vec<SignalOutput> = self.latest.read().await.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    pub async fn len(&self) -> usize {
        self.latest.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.latest.read().await.is_empty()
    }
}

#[async_trait]
impl SignalSink for InMemorySignalBoard {
    async fn publish(&self, output: &SignalOutput) {
        self.latest
            .write()
            .await
            .insert(output.key.clone(), output.clone());
    }
}
