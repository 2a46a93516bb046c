//! Shared error type across eametrics crates.

use thiserror::Error;

/// Stable error codes (used in logs and by hosts that branch on the failure kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Export attempted with no schema attached.
    MissingSchema,
    /// Group is not declared in the schema.
    UnknownGroup,
    /// Field is not declared in the group.
    UnknownField,
    /// Label is not declared on the field.
    UnknownLabel,
    /// Group declared twice.
    DuplicateGroup,
    /// Field declared twice in one group.
    DuplicateField,
    /// Label declared twice on one field.
    DuplicateLabel,
    /// Value cannot be assigned to the field's declared type.
    TypeConversion,
    /// Invalid configuration.
    Config,
    /// Sink I/O failure.
    Io,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingSchema => "MISSING_SCHEMA",
            ErrorCode::UnknownGroup => "UNKNOWN_GROUP",
            ErrorCode::UnknownField => "UNKNOWN_FIELD",
            ErrorCode::UnknownLabel => "UNKNOWN_LABEL",
            ErrorCode::DuplicateGroup => "DUPLICATE_GROUP",
            ErrorCode::DuplicateField => "DUPLICATE_FIELD",
            ErrorCode::DuplicateLabel => "DUPLICATE_LABEL",
            ErrorCode::TypeConversion => "TYPE_CONVERSION",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("no schema attached to metrics registry")]
    MissingSchema,
    #[error("unknown group: {group}")]
    UnknownGroup { group: String },
    #[error("unknown field: {group}.{field}")]
    UnknownField { group: String, field: String },
    #[error("unknown label {label:?} on field {group}.{field}")]
    UnknownLabel {
        group: String,
        field: String,
        label: String,
    },
    #[error("group already declared: {group}")]
    DuplicateGroup { group: String },
    #[error("field already declared: {group}.{field}")]
    DuplicateField { group: String, field: String },
    #[error("label {label:?} already declared on field {group}.{field}")]
    DuplicateLabel {
        group: String,
        field: String,
        label: String,
    },
    #[error("cannot convert {from} value into {to}: {reason}")]
    TypeConversion {
        from: &'static str,
        to: &'static str,
        reason: String,
    },
    #[error("config: {0}")]
    Config(String),
    #[error("io: {0}")]
    Io(String),
}

impl MetricsError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::MissingSchema => ErrorCode::MissingSchema,
            MetricsError::UnknownGroup { .. } => ErrorCode::UnknownGroup,
            MetricsError::UnknownField { .. } => ErrorCode::UnknownField,
            MetricsError::UnknownLabel { .. } => ErrorCode::UnknownLabel,
            MetricsError::DuplicateGroup { .. } => ErrorCode::DuplicateGroup,
            MetricsError::DuplicateField { .. } => ErrorCode::DuplicateField,
            MetricsError::DuplicateLabel { .. } => ErrorCode::DuplicateLabel,
            MetricsError::TypeConversion { .. } => ErrorCode::TypeConversion,
            MetricsError::Config(_) => ErrorCode::Config,
            MetricsError::Io(_) => ErrorCode::Io,
        }
    }

    pub(crate) fn unknown_field(group: &str, field: &str) -> Self {
        MetricsError::UnknownField {
            group: group.to_string(),
            field: field.to_string(),
        }
    }
}
