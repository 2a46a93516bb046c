//! Export cycle driver.
//!
//! One cycle: every source samples into the registry, the registry renders,
//! the sink receives the text, the registry is cleared.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use eametrics_core::error::Result;
use eametrics_core::{MetricsRegistry, Schema};

use crate::sink::MetricsSink;
use crate::source::MetricsSource;

pub struct Exporter {
    registry: MetricsRegistry,
    sources: Vec<Box<dyn MetricsSource>>,
    sink: Box<dyn MetricsSink>,
    interval: Duration,
}

impl Exporter {
    pub fn new(schema: Arc<Schema>, sink: Box<dyn MetricsSink>, interval: Duration) -> Self {
        Self {
            registry: MetricsRegistry::new(schema),
            sources: Vec::new(),
            sink,
            interval,
        }
    }

    /// Override the metric-name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.registry = self.registry.with_prefix(prefix);
        self
    }

    pub fn add_source(&mut self, source: Box<dyn MetricsSource>) {
        debug!(source = source.name(), "metrics source registered");
        self.sources.push(source);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one export cycle and return the text handed to the sink.
    ///
    /// A failing source is logged and skipped; the rest of the cycle proceeds.
    /// Render and sink failures abort the cycle.
    pub async fn run_cycle(&mut self) -> Result<String> {
        self.registry.clear();

        for source in &self.sources {
            if let Err(e) = source.sample(&mut self.registry).await {
                warn!(
                    source = source.name(),
                    code = e.code().as_str(),
                    error = %e,
                    "metrics source failed; continuing cycle"
                );
            }
        }

        let text = self.registry.render();
        let series = self.registry.len();
        self.registry.clear();
        let text = text?;

        self.sink.write(&text).await?;
        debug!(series, bytes = text.len(), "metrics cycle exported");
        Ok(text)
    }

    /// Export every `interval` until `shutdown` flips to true (or its sender
    /// is dropped), then export once more.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            sources = self.sources.len(),
            "metrics exporter started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        error!(code = e.code().as_str(), error = %e, "metrics cycle failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_ok() && !*shutdown.borrow() {
                        continue;
                    }
                    info!("metrics exporter shutting down");
                    // Final export before exit.
                    if let Err(e) = self.run_cycle().await {
                        error!(code = e.code().as_str(), error = %e, "final metrics cycle failed");
                    }
                    break;
                }
            }
        }
    }
}
