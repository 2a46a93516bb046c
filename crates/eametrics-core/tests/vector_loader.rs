//! JSON exposition vector loader shared by core tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;
use std::fs;

use serde::Deserialize;

use eametrics_core::{FieldType, MetricKind, MetricsError, MetricsRegistry, Scalar, Schema};

#[derive(Debug, Deserialize)]
pub struct ExpositionVector {
    pub description: String,
    pub schema: Vec<GroupDecl>,
    #[serde(default)]
    pub values: Vec<ValueSet>,
    #[serde(default)]
    pub expect: Option<String>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupDecl {
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValueSet {
    pub group: String,
    pub field: String,
    pub value: VectorScalar,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VectorScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<VectorScalar> for Scalar {
    fn from(v: VectorScalar) -> Self {
        match v {
            VectorScalar::Bool(b) => Scalar::Bool(b),
            VectorScalar::Int(i) => Scalar::Int(i),
            VectorScalar::Float(x) => Scalar::Float(x),
            VectorScalar::Text(s) => Scalar::Text(s),
        }
    }
}

pub fn load(name: &str) -> ExpositionVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

impl ExpositionVector {
    /// Build the schema, apply every value in order, render.
    pub fn run(&self) -> Result<String, MetricsError> {
        let mut schema = Schema::new();
        for g in &self.schema {
            let kind: MetricKind = g.kind.parse()?;
            schema.add_group(&g.group, kind, &g.help)?;
            for f in &g.fields {
                let ty: FieldType = f.field_type.parse()?;
                schema.add_field(&g.group, &f.name, ty, "")?;
                for l in &f.labels {
                    schema.add_label(&g.group, &f.name, l)?;
                }
            }
        }

        let mut registry = MetricsRegistry::new(schema.seal());
        for v in &self.values {
            let labels: Vec<(&str, &str)> = v
                .labels
                .iter()
                .map(|(k, val)| (k.as_str(), val.as_str()))
                .collect();
            registry.set_value_with_labels(&v.group, &v.field, v.value.clone(), &labels)?;
        }
        registry.render()
    }
}
