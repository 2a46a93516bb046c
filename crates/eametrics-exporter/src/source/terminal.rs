//! Host facts for the `terminal` group.

use std::thread;

use async_trait::async_trait;
use chrono::{Local, Utc};

use eametrics_core::error::Result;
use eametrics_core::{MetricsRegistry, Timestamp};

use super::{set_if_declared, MetricsSource};

const GROUP: &str = "terminal";

/// Samples CPU count, current UTC time and local wall-clock time.
#[derive(Default)]
pub struct TerminalSource;

impl TerminalSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricsSource for TerminalSource {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn sample(&self, registry: &mut MetricsRegistry) -> Result<()> {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        set_if_declared(registry, GROUP, "cpu_cores", cores)?;

        set_if_declared(registry, GROUP, "datetime_time_current", Utc::now())?;

        // Local wall-clock read as if it were UTC, like a terminal's local time.
        let local = Local::now().naive_local().and_utc().timestamp();
        set_if_declared(
            registry,
            GROUP,
            "datetime_time_local",
            Timestamp::from_epoch(local),
        )?;

        Ok(())
    }
}
