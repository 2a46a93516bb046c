//! Exposition sinks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use eametrics_core::error::{MetricsError, Result};

#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn write(&self, text: &str) -> Result<()>;
}

/// Writes the exposition text to a file, replacing it atomically
/// (temp file in the same directory, then rename).
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl MetricsSink for FileSink {
    async fn write(&self, text: &str) -> Result<()> {
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, text.as_bytes())
            .await
            .map_err(|e| MetricsError::Io(format!("write {} failed: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            MetricsError::Io(format!("rename to {} failed: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "metrics written");
        Ok(())
    }
}
