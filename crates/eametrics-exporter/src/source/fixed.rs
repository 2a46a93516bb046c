use async_trait::async_trait;
use tracing::warn;

use eametrics_core::error::{MetricsError, Result};
use eametrics_core::{MetricsRegistry, Scalar};

use super::MetricsSource;
use crate::config::StaticValueConfig;

struct StaticValue {
    group: String,
    field: String,
    value: Scalar,
    labels: Vec<(String, String)>,
}

/// Sets the same configured values on every cycle.
#[derive(Default)]
pub struct StaticSource {
    values: Vec<StaticValue>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(values: &[StaticValueConfig]) -> Self {
        let mut src = Self::new();
        for v in values {
            let labels: Vec<(&str, &str)> = v.label_pairs();
            src.push(&v.group, &v.field, v.value.clone(), &labels);
        }
        src
    }

    pub fn push(
        &mut self,
        group: &str,
        field: &str,
        value: impl Into<Scalar>,
        labels: &[(&str, &str)],
    ) {
        self.values.push(StaticValue {
            group: group.to_string(),
            field: field.to_string(),
            value: value.into(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl MetricsSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    /// Sets every configured value. A rejected entry is logged and does not
    /// stop the rest; the first rejection is returned.
    async fn sample(&self, registry: &mut MetricsRegistry) -> Result<()> {
        let mut first_err: Option<MetricsError> = None;
        for v in &self.values {
            let labels: Vec<(&str, &str)> = v
                .labels
                .iter()
                .map(|(k, val)| (k.as_str(), val.as_str()))
                .collect();
            if let Err(e) =
                registry.set_value_with_labels(&v.group, &v.field, v.value.clone(), &labels)
            {
                warn!(
                    group = %v.group,
                    field = %v.field,
                    code = e.code().as_str(),
                    error = %e,
                    "static value rejected"
                );
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
