//! Built-in schema used when the config declares none.

use eametrics_core::error::Result;
use eametrics_core::{FieldType, MetricKind, Schema};

const STRATEGY_LABELS: [&str; 2] = ["strategy", "tf"];

pub fn default_schema() -> Result<Schema> {
    let mut s = Schema::new();

    s.add_group("account", MetricKind::Gauge, "Account details")?;
    for f in [
        "balance",
        "credit",
        "equity",
        "margin",
        "margin_free",
        "margin_level",
        "profit",
    ] {
        s.add_field("account", f, FieldType::Double, "")?;
    }

    s.add_group("ea", MetricKind::Gauge, "EA Information")?;
    s.add_field("ea", "risk_margin_max", FieldType::Double, "")?;
    s.add_field("ea", "stg_processed_periods", FieldType::Int, "")?;
    s.add_field("ea", "total_strategies_active", FieldType::Int, "")?;

    s.add_group("order", MetricKind::Gauge, "Order Information")?;
    s.add_field("order", "order1_date_time", FieldType::Datetime, "")?;
    s.add_field("order", "order1_status", FieldType::String, "")?;
    s.add_field("order", "order1_stop_loss", FieldType::Double, "")?;

    s.add_group("trade", MetricKind::Gauge, "Trade Information")?;
    for (f, ty) in [
        ("lot_size", FieldType::Float),
        ("magic_no", FieldType::Long),
        ("max_spread", FieldType::Float),
    ] {
        s.add_field("trade", f, ty, "")?;
        for l in STRATEGY_LABELS {
            s.add_label("trade", f, l)?;
        }
    }

    s.add_group("strategy", MetricKind::Gauge, "Strategy Information")?;
    for (f, ty) in [("id", FieldType::Int), ("lot_size", FieldType::Double)] {
        s.add_field("strategy", f, ty, "")?;
        for l in STRATEGY_LABELS {
            s.add_label("strategy", f, l)?;
        }
    }

    s.add_group("symbol", MetricKind::Gauge, "Symbol Information")?;
    s.add_field("symbol", "tick_price", FieldType::Double, "")?;
    s.add_label("symbol", "tick_price", "symbol")?;

    s.add_group("terminal", MetricKind::Gauge, "Terminal Information")?;
    for (f, ty) in [
        ("cpu_cores", FieldType::Int),
        ("datetime_time_current", FieldType::Datetime),
        ("datetime_time_local", FieldType::Datetime),
        ("datetime_time_trade_server", FieldType::Int),
        ("disk_space", FieldType::Long),
        ("last_error", FieldType::String),
        ("memory_available", FieldType::Long),
        ("memory_physical", FieldType::Long),
        ("memory_total", FieldType::Long),
        ("memory_used", FieldType::Long),
        ("connected", FieldType::Bool),
        ("ping_last", FieldType::Int),
    ] {
        s.add_field("terminal", f, ty, "")?;
    }

    Ok(s)
}
