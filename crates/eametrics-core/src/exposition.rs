//! Prometheus text exposition primitives.
//!
//! Line grammar:
//! - `# HELP <group> <help>` (only when help is non-empty)
//! - `# TYPE <group> <kind>`
//! - `<prefix><field>{label="value", ...} <value>`
//!
//! Groups are separated by one blank line. There is no `# EOF` trailer.

use std::borrow::Cow;
use std::fmt::Write;

use crate::registry::MetricsValue;
use crate::schema::{SchemaField, SchemaGroup};

/// Default metric-name prefix.
pub const DEFAULT_PREFIX: &str = "ea_";

/// Escape a label value (`\`, `"` and newline).
pub fn escape_label(v: &str) -> Cow<'_, str> {
    if !v.contains(['\\', '"', '\n']) {
        return Cow::Borrowed(v);
    }
    Cow::Owned(
        v.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n"),
    )
}

/// Escape HELP text (`\` and newline).
pub fn escape_help(v: &str) -> Cow<'_, str> {
    if !v.contains(['\\', '\n']) {
        return Cow::Borrowed(v);
    }
    Cow::Owned(v.replace('\\', "\\\\").replace('\n', "\\n"))
}

pub(crate) fn write_group_header(out: &mut String, group: &SchemaGroup) {
    if !group.help().is_empty() {
        let _ = writeln!(out, "# HELP {} {}", group.name(), escape_help(group.help()));
    }
    let _ = writeln!(out, "# TYPE {} {}", group.name(), group.kind());
}

/// One metric line. Labels follow the field's declaration order; a label the
/// value does not carry renders as `""`.
pub(crate) fn write_sample(
    out: &mut String,
    prefix: &str,
    field: &SchemaField,
    value: &MetricsValue,
) {
    out.push_str(prefix);
    out.push_str(field.name());

    if !field.labels().is_empty() {
        out.push('{');
        for (i, label) in field.labels().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let v = value.label(label).unwrap_or("");
            let _ = write!(out, "{}=\"{}\"", label, escape_label(v));
        }
        out.push('}');
    }

    let _ = writeln!(out, " {}", value.value());
}
