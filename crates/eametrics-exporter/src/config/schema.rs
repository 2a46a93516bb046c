use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use eametrics_core::error::{MetricsError, Result};
use eametrics_core::{FieldType, MetricKind, MetricsRegistry, Scalar, Schema};

use super::defaults::default_schema;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    /// Declared schema. Omitted or empty means the built-in default schema.
    #[serde(default)]
    pub schema: Vec<GroupConfig>,

    #[serde(default)]
    pub static_values: Vec<StaticValueConfig>,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.exporter.validate()?;

        // Building the schema and applying static values surfaces any
        // duplicate, unknown or mistyped entry at load time.
        let schema = self.build_schema()?.seal();
        let mut registry = MetricsRegistry::new(schema);
        for v in &self.static_values {
            let labels = v.label_pairs();
            registry.set_value_with_labels(&v.group, &v.field, v.value.clone(), &labels)?;
        }

        Ok(())
    }

    /// Build the schema declared in `schema`, or the default one.
    pub fn build_schema(&self) -> Result<Schema> {
        if self.schema.is_empty() {
            return default_schema();
        }

        let mut schema = Schema::new();
        for g in &self.schema {
            let kind: MetricKind = g.kind.parse()?;
            schema.add_group(&g.group, kind, &g.help)?;

            for f in &g.fields {
                let ty: FieldType = f.field_type.parse()?;
                schema.add_field(&g.group, &f.name, ty, &f.help)?;
                for label in &f.labels {
                    schema.add_label(&g.group, &f.name, label)?;
                }
            }
        }
        Ok(schema)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            output: default_output(),
            interval_ms: default_interval_ms(),
            prefix: default_prefix(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if self.output.trim().is_empty() {
            return Err(MetricsError::Config("exporter.output must not be empty".into()));
        }
        if !(1000..=3_600_000).contains(&self.interval_ms) {
            return Err(MetricsError::Config(
                "exporter.interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_output() -> String {
    "metrics".into()
}
fn default_interval_ms() -> u64 {
    60000
}
fn default_prefix() -> String {
    "ea_".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Constant value set on every cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticValueConfig {
    pub group: String,
    pub field: String,
    pub value: ConfigScalar,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl StaticValueConfig {
    pub fn label_pairs(&self) -> Vec<(&str, &str)> {
        self.labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// YAML scalar as written; converted by the field's declared type on set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<ConfigScalar> for Scalar {
    fn from(v: ConfigScalar) -> Self {
        match v {
            ConfigScalar::Bool(b) => Scalar::Bool(b),
            ConfigScalar::Int(i) => Scalar::Int(i),
            ConfigScalar::Float(x) => Scalar::Float(x),
            ConfigScalar::Text(s) => Scalar::Text(s),
        }
    }
}
