#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use eametrics_core::error::{MetricsError, Result};
use eametrics_core::{FieldType, MetricKind, MetricsRegistry, Schema};
use eametrics_exporter::{
    Exporter, FileSink, MetricsSink, MetricsSource, StaticSource, TerminalSource,
};

#[derive(Clone, Default)]
struct MemorySink {
    writes: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl MetricsSink for MemorySink {
    async fn write(&self, text: &str) -> Result<()> {
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct FailingSource;

#[async_trait]
impl MetricsSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn sample(&self, registry: &mut MetricsRegistry) -> Result<()> {
        registry.set_value("account", "nope", 1)
    }
}

fn schema() -> Arc<Schema> {
    let mut s = Schema::new();
    s.add_group("account", MetricKind::Gauge, "Account details").unwrap();
    s.add_field("account", "balance", FieldType::Double, "").unwrap();
    s.add_group("terminal", MetricKind::Gauge, "").unwrap();
    s.add_field("terminal", "cpu_cores", FieldType::Int, "").unwrap();
    s.add_field("terminal", "datetime_time_current", FieldType::Datetime, "")
        .unwrap();
    s.seal()
}

fn static_balance() -> StaticSource {
    let mut src = StaticSource::new();
    src.push("account", "balance", 1000.5, &[]);
    src
}

#[tokio::test]
async fn cycle_renders_and_writes() {
    let sink = MemorySink::default();
    let mut exporter = Exporter::new(schema(), Box::new(sink.clone()), Duration::from_secs(60));
    exporter.add_source(Box::new(static_balance()));

    let text = exporter.run_cycle().await.unwrap();
    assert_eq!(
        text,
        "# HELP account Account details\n# TYPE account gauge\nea_balance 1000.5\n\n# TYPE terminal gauge\n"
    );
    assert_eq!(sink.writes.lock().unwrap().as_slice(), [text]);
}

#[tokio::test]
async fn failing_source_does_not_abort_cycle() {
    let sink = MemorySink::default();
    let mut exporter = Exporter::new(schema(), Box::new(sink.clone()), Duration::from_secs(60));
    exporter.add_source(Box::new(FailingSource));
    exporter.add_source(Box::new(static_balance()));

    let text = exporter.run_cycle().await.unwrap();
    assert!(text.contains("ea_balance 1000.5\n"));
}

#[tokio::test]
async fn terminal_source_fills_declared_fields_only() {
    let mut exporter =
        Exporter::new(schema(), Box::new(MemorySink::default()), Duration::from_secs(60));
    exporter.add_source(Box::new(TerminalSource::new()));

    let text = exporter.run_cycle().await.unwrap();
    assert!(text.contains("\nea_cpu_cores "), "{text}");
    assert!(text.contains("\nea_datetime_time_current "), "{text}");
    assert!(!text.contains("datetime_time_local"), "{text}");
}

#[tokio::test]
async fn prefix_is_applied() {
    let sink = MemorySink::default();
    let mut exporter = Exporter::new(schema(), Box::new(sink.clone()), Duration::from_secs(60))
        .with_prefix("bot_");
    exporter.add_source(Box::new(static_balance()));

    let text = exporter.run_cycle().await.unwrap();
    assert!(text.contains("\nbot_balance 1000.5\n"));
}

#[tokio::test]
async fn file_sink_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics");

    let sink = FileSink::new(&path);
    sink.write("first\n").await.unwrap();
    sink.write("second\n").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    assert!(!dir.path().join("metrics.tmp").exists());
}

#[tokio::test]
async fn file_sink_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::new(dir.path().join("missing").join("metrics"));
    let err = sink.write("x\n").await.unwrap_err();
    assert!(matches!(err, MetricsError::Io(_)), "{err}");
}

#[tokio::test]
async fn run_exports_until_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics");

    let mut exporter =
        Exporter::new(schema(), Box::new(FileSink::new(&path)), Duration::from_secs(1));
    exporter.add_source(Box::new(static_balance()));

    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    exporter.run(rx).await;

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("ea_balance 1000.5\n"));
}

#[tokio::test]
async fn static_source_sets_valid_entries_past_a_rejected_one() {
    let mut src = StaticSource::new();
    src.push("account", "nope", 1, &[]);
    src.push("account", "balance", 7.25, &[("region", "eu")]);
    src.push("account", "balance", 1000.5, &[]);
    src.push("terminal", "cpu_cores", 8, &[]);

    let mut registry = MetricsRegistry::new(schema());
    let err = src.sample(&mut registry).await.unwrap_err();
    assert!(matches!(err, MetricsError::UnknownField { .. }), "{err}");

    assert_eq!(registry.len(), 2);
    let text = registry.render().unwrap();
    assert!(text.contains("ea_balance 1000.5\n"), "{text}");
    assert!(text.contains("ea_cpu_cores 8\n"), "{text}");
}

#[tokio::test]
async fn run_keeps_exporting_while_shutdown_sender_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics");

    let mut exporter = Exporter::new(
        schema(),
        Box::new(FileSink::new(&path)),
        Duration::from_millis(10),
    );
    exporter.add_source(Box::new(static_balance()));

    let (_tx, rx) = watch::channel(false);
    let res = tokio::time::timeout(Duration::from_millis(100), exporter.run(rx)).await;
    assert!(res.is_err(), "exporter stopped with the sender still alive");

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("ea_balance 1000.5\n"));
}
