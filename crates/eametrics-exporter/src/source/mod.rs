//! Metric sources sampled once per export cycle.
//!
//! A source writes values into the cycle's registry. Sources never see the
//! exposition text and never touch the sink.

pub mod fixed;
pub mod terminal;

use async_trait::async_trait;
use tracing::debug;

use eametrics_core::error::{ErrorCode, Result};
use eametrics_core::{MetricsRegistry, Scalar};

pub use fixed::StaticSource;
pub use terminal::TerminalSource;

#[async_trait]
pub trait MetricsSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn sample(&self, registry: &mut MetricsRegistry) -> Result<()>;
}

/// Set a value only if the schema declares the field; other errors propagate.
pub(crate) fn set_if_declared(
    registry: &mut MetricsRegistry,
    group: &str,
    field: &str,
    value: impl Into<Scalar>,
) -> Result<()> {
    match registry.set_value(group, field, value) {
        Err(e) if e.code() == ErrorCode::UnknownField => {
            debug!(%group, %field, "field not in schema; skipped");
            Ok(())
        }
        other => other,
    }
}
