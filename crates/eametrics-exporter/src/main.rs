//! eametrics exporter binary.
//!
//! - Config: `$EAMETRICS_CONFIG` (default `eametrics.yaml`), strict YAML
//! - Sources: configured static values + terminal facts
//! - Sink: exposition text file, rewritten every `exporter.interval_ms`
//! - Ctrl-C: final export, then exit

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use eametrics_core::error::Result;
use eametrics_exporter::{config, Exporter, FileSink, StaticSource, TerminalSource};

const DEFAULT_CONFIG: &str = "eametrics.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "eametrics-exporter failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("EAMETRICS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let cfg = config::load_from_file(&path)?;

    let schema = cfg.build_schema()?.seal();
    tracing::info!(config = %path, groups = schema.groups().len(), output = %cfg.exporter.output, "eametrics-exporter starting");

    let sink = FileSink::new(&cfg.exporter.output);
    let mut exporter = Exporter::new(schema, Box::new(sink), cfg.exporter.interval())
        .with_prefix(cfg.exporter.prefix.clone());
    exporter.add_source(Box::new(StaticSource::from_config(&cfg.static_values)));
    exporter.add_source(Box::new(TerminalSource::new()));

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => {
                // Dropping `tx` would stop the exporter, so hold it.
                tracing::error!(error = %e, "ctrl-c handler unavailable; running until killed");
                std::future::pending::<()>().await;
            }
        }
    });

    exporter.run(rx).await;
    Ok(())
}
