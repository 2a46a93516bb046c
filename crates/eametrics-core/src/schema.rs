//! Metrics schema: groups, fields and labels.
//!
//! The schema is the single source of truth for what may be set and in which
//! order it is exported. It only grows: there is no removal. Insertion order of
//! groups, fields and labels is the exposition order.
//!
//! Build it through `&mut self`, then share it with registries via
//! [`Schema::seal`]. An `Arc<Schema>` hands out no mutable access, so a schema
//! cannot change under an export.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MetricsError, Result};
use crate::value::FieldType;

/// Prometheus metric kind, declared per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Summary,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
            MetricKind::Summary => "summary",
        }
    }
}

impl FromStr for MetricKind {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "counter" => Ok(MetricKind::Counter),
            "gauge" => Ok(MetricKind::Gauge),
            "histogram" => Ok(MetricKind::Histogram),
            "summary" => Ok(MetricKind::Summary),
            other => Err(MetricsError::Config(format!("unknown metric kind: {other}"))),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared metric field.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    name: String,
    field_type: FieldType,
    help: String,
    labels: Vec<String>,
}

impl SchemaField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Declared label names, in exposition order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Named collection of fields sharing a metric kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGroup {
    name: String,
    kind: MetricKind,
    help: String,
    fields: Vec<SchemaField>,
}

impl SchemaGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut SchemaField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    groups: Vec<SchemaGroup>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a group. Fails with `DuplicateGroup` if the name is taken.
    pub fn add_group(&mut self, name: &str, kind: MetricKind, help: &str) -> Result<()> {
        if self.group(name).is_some() {
            return Err(MetricsError::DuplicateGroup {
                group: name.to_string(),
            });
        }
        self.groups.push(SchemaGroup {
            name: name.to_string(),
            kind,
            help: help.to_string(),
            fields: Vec::new(),
        });
        debug!(group = %name, %kind, "schema group added");
        Ok(())
    }

    /// Declare a field in an existing group.
    pub fn add_field(
        &mut self,
        group: &str,
        name: &str,
        field_type: FieldType,
        help: &str,
    ) -> Result<()> {
        let g = self
            .groups
            .iter_mut()
            .find(|g| g.name == group)
            .ok_or_else(|| MetricsError::UnknownGroup {
                group: group.to_string(),
            })?;

        if g.field(name).is_some() {
            return Err(MetricsError::DuplicateField {
                group: group.to_string(),
                field: name.to_string(),
            });
        }

        g.fields.push(SchemaField {
            name: name.to_string(),
            field_type,
            help: help.to_string(),
            labels: Vec::new(),
        });
        debug!(%group, field = %name, %field_type, "schema field added");
        Ok(())
    }

    /// Append a label name to an existing field.
    pub fn add_label(&mut self, group: &str, field: &str, label: &str) -> Result<()> {
        let f = self
            .groups
            .iter_mut()
            .find(|g| g.name == group)
            .and_then(|g| g.field_mut(field))
            .ok_or_else(|| MetricsError::unknown_field(group, field))?;

        if f.has_label(label) {
            return Err(MetricsError::DuplicateLabel {
                group: group.to_string(),
                field: field.to_string(),
                label: label.to_string(),
            });
        }

        f.labels.push(label.to_string());
        Ok(())
    }

    /// Look up a field. A missing group is reported as `UnknownField` as well.
    pub fn field(&self, group: &str, field: &str) -> Result<&SchemaField> {
        self.group(group)
            .and_then(|g| g.field(field))
            .ok_or_else(|| MetricsError::unknown_field(group, field))
    }

    pub fn group(&self, name: &str) -> Option<&SchemaGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[SchemaGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Finish building and share.
    pub fn seal(self) -> Arc<Schema> {
        Arc::new(self)
    }
}
