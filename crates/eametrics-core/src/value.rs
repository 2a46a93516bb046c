//! Typed scalar values.
//!
//! A `TypedValue` is created with a declared `FieldType` and keeps that type for
//! its whole life. Assignments from any `Scalar` go through one conversion table
//! (`convert`); an incompatible assignment returns `TypeConversion` and leaves the
//! stored value untouched.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{MetricsError, Result};

/// Canonical storage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Integer64,
    Float64,
    ShortText,
    Timestamp,
}

impl ScalarType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Integer64 => "integer64",
            ScalarType::Float64 => "float64",
            ScalarType::ShortText => "text",
            ScalarType::Timestamp => "timestamp",
        }
    }
}

/// Type a field is declared with. Several declared types share one storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    String,
    Datetime,
}

impl FieldType {
    /// Storage type this declared type collapses onto.
    pub fn scalar(self) -> ScalarType {
        match self {
            FieldType::Bool => ScalarType::Boolean,
            FieldType::Short
            | FieldType::UShort
            | FieldType::Int
            | FieldType::UInt
            | FieldType::Long
            | FieldType::ULong => ScalarType::Integer64,
            FieldType::Float | FieldType::Double => ScalarType::Float64,
            FieldType::String => ScalarType::ShortText,
            FieldType::Datetime => ScalarType::Timestamp,
        }
    }

    /// Integer types narrower than 64 bits.
    pub fn is_narrow_integer(self) -> bool {
        matches!(
            self,
            FieldType::Short | FieldType::UShort | FieldType::Int | FieldType::UInt
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Short => "short",
            FieldType::UShort => "ushort",
            FieldType::Int => "int",
            FieldType::UInt => "uint",
            FieldType::Long => "long",
            FieldType::ULong => "ulong",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Datetime => "datetime",
        }
    }
}

impl FromStr for FieldType {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "bool" => FieldType::Bool,
            "short" => FieldType::Short,
            "ushort" => FieldType::UShort,
            "int" => FieldType::Int,
            "uint" => FieldType::UInt,
            "long" => FieldType::Long,
            "ulong" => FieldType::ULong,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "string" => FieldType::String,
            "datetime" => FieldType::Datetime,
            other => {
                return Err(MetricsError::Config(format!("unknown field type: {other}")));
            }
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point in time, stored as seconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M";

const DATETIME_FORMATS: [&str; 5] = [
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y.%m.%d", "%Y-%m-%d"];

impl Timestamp {
    pub fn from_epoch(secs: i64) -> Self {
        Self(secs)
    }

    pub fn epoch(self) -> i64 {
        self.0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Parse `YYYY.MM.DD[ HH:MM[:SS]]`, the same with `-` separators, or RFC 3339.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self(dt.and_utc().timestamp()));
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return d.and_hms_opt(0, 0, 0).map(|dt| Self(dt.and_utc().timestamp()));
            }
        }
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.timestamp()))
    }

    /// Render as `YYYY.MM.DD HH:MM` (UTC).
    pub fn to_text(self) -> Option<String> {
        self.to_datetime()
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Self(d.as_secs() as i64),
            Err(e) => Self(-(e.duration().as_secs() as i64)),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }
}

/// One source value, before conversion into a declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(Timestamp),
}

impl Scalar {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Bool(_) => ScalarType::Boolean,
            Scalar::Int(_) => ScalarType::Integer64,
            Scalar::Float(_) => ScalarType::Float64,
            Scalar::Text(_) => ScalarType::ShortText,
            Scalar::Timestamp(_) => ScalarType::Timestamp,
        }
    }

    fn zero(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Boolean => Scalar::Bool(false),
            ScalarType::Integer64 => Scalar::Int(0),
            ScalarType::Float64 => Scalar::Float(0.0),
            ScalarType::ShortText => Scalar::Text(String::new()),
            ScalarType::Timestamp => Scalar::Timestamp(Timestamp::default()),
        }
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::Int(v as i64)
            }
        })*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<Timestamp> for Scalar {
    fn from(v: Timestamp) -> Self {
        Scalar::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(v: DateTime<Utc>) -> Self {
        Scalar::Timestamp(v.into())
    }
}

impl From<SystemTime> for Scalar {
    fn from(v: SystemTime) -> Self {
        Scalar::Timestamp(v.into())
    }
}

/// Text tokens that read as `true` when assigned to a boolean field.
const TRUTHY: [&str; 9] = [
    "+", "True", "true", "Yes", "yes", "On", "on", "Enabled", "enabled",
];

fn mismatch(from: ScalarType, to: FieldType, reason: impl Into<String>) -> MetricsError {
    MetricsError::TypeConversion {
        from: from.as_str(),
        to: to.as_str(),
        reason: reason.into(),
    }
}

/// Convert `value` into the storage representation of `to`.
pub fn convert(value: Scalar, to: FieldType) -> Result<Scalar> {
    let from = value.scalar_type();
    let target = to.scalar();

    let out = match (value, target) {
        (Scalar::Bool(b), ScalarType::Boolean) => Scalar::Bool(b),
        (Scalar::Bool(b), ScalarType::Integer64) => Scalar::Int(i64::from(b)),
        (Scalar::Bool(b), ScalarType::Float64) => Scalar::Float(if b { 1.0 } else { 0.0 }),
        (Scalar::Bool(b), ScalarType::ShortText) => {
            Scalar::Text(String::from(if b { "True" } else { "False" }))
        }
        (Scalar::Bool(_), ScalarType::Timestamp) => {
            return Err(mismatch(from, to, "no epoch mapping for booleans"));
        }

        (Scalar::Int(i), ScalarType::Boolean) => Scalar::Bool(i != 0),
        (Scalar::Int(i), ScalarType::Integer64) => Scalar::Int(i),
        (Scalar::Int(i), ScalarType::Float64) => Scalar::Float(i as f64),
        (Scalar::Int(i), ScalarType::ShortText) => Scalar::Text(i.to_string()),
        (Scalar::Int(i), ScalarType::Timestamp) => Scalar::Timestamp(Timestamp(i)),

        (Scalar::Float(x), ScalarType::Boolean) => Scalar::Bool(x != 0.0),
        (Scalar::Float(x), ScalarType::Integer64) => {
            if !x.is_finite() {
                return Err(mismatch(from, to, format!("non-finite value {x}")));
            }
            let t = x.trunc();
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            if t < i64::MIN as f64 || t >= i64::MAX as f64 {
                return Err(mismatch(from, to, format!("{x} out of 64-bit range")));
            }
            Scalar::Int(t as i64)
        }
        (Scalar::Float(x), ScalarType::Float64) => Scalar::Float(x),
        (Scalar::Float(x), ScalarType::ShortText) => Scalar::Text(format_float(x, false)),
        (Scalar::Float(_), ScalarType::Timestamp) => {
            return Err(mismatch(from, to, "no epoch mapping for floats"));
        }

        (Scalar::Text(s), ScalarType::Boolean) => Scalar::Bool(TRUTHY.contains(&s.as_str())),
        (Scalar::Text(s), ScalarType::Integer64) => match s.trim().parse::<i64>() {
            Ok(i) => Scalar::Int(i),
            Err(e) => return Err(mismatch(from, to, format!("{s:?}: {e}"))),
        },
        (Scalar::Text(s), ScalarType::Float64) => match s.trim().parse::<f64>() {
            Ok(x) => Scalar::Float(x),
            Err(e) => return Err(mismatch(from, to, format!("{s:?}: {e}"))),
        },
        (Scalar::Text(s), ScalarType::ShortText) => Scalar::Text(s),
        (Scalar::Text(s), ScalarType::Timestamp) => match Timestamp::parse(&s) {
            Some(t) => Scalar::Timestamp(t),
            None => return Err(mismatch(from, to, format!("{s:?} is not a timestamp"))),
        },

        (Scalar::Timestamp(_), ScalarType::Boolean | ScalarType::Float64) => {
            return Err(mismatch(from, to, "timestamps only convert to 64-bit integers"));
        }
        (Scalar::Timestamp(_), ScalarType::Integer64) if to.is_narrow_integer() => {
            return Err(mismatch(from, to, "integer narrower than 64 bits"));
        }
        (Scalar::Timestamp(t), ScalarType::Integer64) => Scalar::Int(t.epoch()),
        (Scalar::Timestamp(t), ScalarType::ShortText) => match t.to_text() {
            Some(s) => Scalar::Text(s),
            None => return Err(mismatch(from, to, format!("epoch {} out of range", t.epoch()))),
        },
        (Scalar::Timestamp(t), ScalarType::Timestamp) => Scalar::Timestamp(t),
    };

    Ok(out)
}

/// Shortest round-trip decimal. Non-finite values use the exposition tokens.
pub fn format_float(x: f64, single: bool) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x == f64::INFINITY {
        "+Inf".to_string()
    } else if x == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if single {
        (x as f32).to_string()
    } else {
        x.to_string()
    }
}

/// A single scalar whose declared type is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    declared: FieldType,
    value: Scalar,
}

impl TypedValue {
    /// Zero value of the declared type (`false`, `0`, `0.0`, `""`, epoch 0).
    pub fn new(declared: FieldType) -> Self {
        Self {
            declared,
            value: Scalar::zero(declared.scalar()),
        }
    }

    /// Build and assign in one step.
    pub fn with_value(declared: FieldType, value: impl Into<Scalar>) -> Result<Self> {
        let mut v = Self::new(declared);
        v.set(value)?;
        Ok(v)
    }

    pub fn declared(&self) -> FieldType {
        self.declared
    }

    /// Stored representation; its `scalar_type()` always equals `declared().scalar()`.
    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// Assign from any supported source type. On error the previous value is kept.
    pub fn set(&mut self, value: impl Into<Scalar>) -> Result<()> {
        self.value = convert(value.into(), self.declared)?;
        Ok(())
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Scalar::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => f.write_str(&format_float(*x, self.declared == FieldType::Float)),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Timestamp(t) => write!(f, "{}", t.epoch()),
        }
    }
}
