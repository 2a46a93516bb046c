//! eametrics core: typed metrics schema, value registry and Prometheus text exporter.
//!
//! The host builds a [`Schema`] once, seals it, then per sampling cycle sets
//! values on a [`MetricsRegistry`] and renders them. The crate performs no I/O
//! and holds no global state.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every schema-build and
//! value-set failure is returned as a `MetricsError` so the host decides whether
//! to skip a metric, abort the cycle or stop.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod registry;
pub mod schema;
pub mod value;

pub use error::{ErrorCode, MetricsError, Result};
pub use registry::{MetricsRegistry, MetricsValue};
pub use schema::{MetricKind, Schema, SchemaField, SchemaGroup};
pub use value::{FieldType, Scalar, ScalarType, Timestamp, TypedValue};
