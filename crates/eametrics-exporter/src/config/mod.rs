//! Exporter config loader (strict parsing).

pub mod defaults;
pub mod schema;

use std::fs;

use eametrics_core::error::{MetricsError, Result};

pub use defaults::default_schema;
pub use schema::{
    ConfigScalar, ExporterConfig, ExporterSection, FieldConfig, GroupConfig, StaticValueConfig,
};

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Io(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
