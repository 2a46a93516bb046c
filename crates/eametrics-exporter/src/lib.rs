//! eametrics exporter library entry.
//!
//! Host-side glue around `eametrics-core`: strict YAML config that declares the
//! schema, metric sources sampled per cycle, a file sink for the exposition text
//! and the periodic export loop. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod config;
pub mod exporter;
pub mod sink;
pub mod source;

pub use exporter::Exporter;
pub use sink::{FileSink, MetricsSink};
pub use source::{MetricsSource, StaticSource, TerminalSource};
