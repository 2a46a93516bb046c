//! Per-cycle value store and exporter.
//!
//! The registry holds a shared handle to a sealed [`Schema`] and the values set
//! during one sampling cycle. Export walks the schema, not the stored values, so
//! ordering and omission are schema-driven.
//!
//! Series are keyed by `(group, field, label values in declaration order)`.
//! A field without labels therefore keeps one value (last write wins); a labeled
//! field keeps one value per distinct label set, emitted in first-set order.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::error::{MetricsError, Result};
use crate::exposition::{write_group_header, write_sample, DEFAULT_PREFIX};
use crate::schema::{Schema, SchemaField};
use crate::value::{Scalar, TypedValue};

/// One observed value bound to a `(group, field)` identity.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsValue {
    group: String,
    field: String,
    value: TypedValue,
    labels: BTreeMap<String, String>,
}

impl MetricsValue {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

struct Series {
    key: Vec<String>,
    value: MetricsValue,
}

fn series_key(field: &SchemaField, labels: &BTreeMap<String, String>) -> Vec<String> {
    field
        .labels()
        .iter()
        .map(|l| labels.get(l).cloned().unwrap_or_default())
        .collect()
}

pub struct MetricsRegistry {
    schema: Option<Arc<Schema>>,
    prefix: String,
    // group -> field -> series
    values: HashMap<String, HashMap<String, Vec<Series>>>,
}

impl MetricsRegistry {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema: Some(schema),
            prefix: DEFAULT_PREFIX.to_string(),
            values: HashMap::new(),
        }
    }

    /// Registry with no schema yet; setting or exporting fails with `MissingSchema`.
    pub fn detached() -> Self {
        Self {
            schema: None,
            prefix: DEFAULT_PREFIX.to_string(),
            values: HashMap::new(),
        }
    }

    /// Override the metric-name prefix (`ea_` by default).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Attach a schema. Values stored against a previous schema are dropped.
    pub fn set_schema(&mut self, schema: Arc<Schema>) {
        self.values.clear();
        self.schema = Some(schema);
    }

    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Drop all stored values. The schema stays attached.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of stored series.
    pub fn len(&self) -> usize {
        self.values
            .values()
            .flat_map(|fields| fields.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set an unlabeled value.
    pub fn set_value(&mut self, group: &str, field: &str, value: impl Into<Scalar>) -> Result<()> {
        self.set_value_with_labels(group, field, value, &[])
    }

    /// Convert `value` to the field's declared type and store it under the
    /// given label set.
    ///
    /// Fails with `UnknownField` for undeclared fields, `UnknownLabel` for label
    /// names the field does not declare and `TypeConversion` when the value does
    /// not fit the declared type. Nothing is stored on failure.
    pub fn set_value_with_labels(
        &mut self,
        group: &str,
        field: &str,
        value: impl Into<Scalar>,
        labels: &[(&str, &str)],
    ) -> Result<()> {
        let schema = Arc::clone(self.schema.as_ref().ok_or(MetricsError::MissingSchema)?);
        let decl = schema.field(group, field)?;

        let mut label_map = BTreeMap::new();
        for (name, v) in labels {
            if !decl.has_label(name) {
                return Err(MetricsError::UnknownLabel {
                    group: group.to_string(),
                    field: field.to_string(),
                    label: name.to_string(),
                });
            }
            label_map.insert(name.to_string(), v.to_string());
        }

        let typed = TypedValue::with_value(decl.field_type(), value)?;
        let key = series_key(decl, &label_map);
        debug!(%group, %field, value = %typed, "metric value set");

        let entry = MetricsValue {
            group: group.to_string(),
            field: field.to_string(),
            value: typed,
            labels: label_map,
        };

        let series = self
            .values
            .entry(group.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default();

        match series.iter().position(|s| s.key == key) {
            Some(i) => series[i].value = entry,
            None => series.push(Series { key, value: entry }),
        }
        Ok(())
    }

    /// Stored series of one field, in first-set order.
    pub fn series(&self, group: &str, field: &str) -> impl Iterator<Item = &MetricsValue> {
        self.values
            .get(group)
            .and_then(|fields| fields.get(field))
            .into_iter()
            .flatten()
            .map(|s| &s.value)
    }

    /// The series of a field matching `labels` (missing labels match `""`).
    pub fn get(&self, group: &str, field: &str, labels: &[(&str, &str)]) -> Option<&MetricsValue> {
        let decl = self.schema.as_ref()?.field(group, field).ok()?;
        let map: BTreeMap<String, String> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let key = series_key(decl, &map);
        self.values
            .get(group)?
            .get(field)?
            .iter()
            .find(|s| s.key == key)
            .map(|s| &s.value)
    }

    /// Render the exposition text. Read-only: repeated calls without an
    /// intervening set or clear return identical output.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    /// Append the exposition text to `out`.
    pub fn render_into(&self, out: &mut String) -> Result<()> {
        let schema = self.schema.as_ref().ok_or(MetricsError::MissingSchema)?;

        for (i, group) in schema.groups().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            write_group_header(out, group);

            let Some(stored) = self.values.get(group.name()) else {
                continue;
            };
            for field in group.fields() {
                let Some(series) = stored.get(field.name()) else {
                    continue;
                };
                for s in series {
                    write_sample(out, &self.prefix, field, &s.value);
                }
            }
        }
        Ok(())
    }
}
