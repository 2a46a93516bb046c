//! Conversion table and rendering policy of `TypedValue`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use eametrics_core::{ErrorCode, FieldType, Scalar, Timestamp, TypedValue};

// 2024-01-02 03:04:05 UTC
const TS: i64 = 1_704_164_645;

fn render(ty: FieldType, v: impl Into<Scalar>) -> String {
    TypedValue::with_value(ty, v).unwrap().to_string()
}

fn fails(ty: FieldType, v: impl Into<Scalar>) {
    let e = TypedValue::with_value(ty, v).expect_err("conversion must fail");
    assert_eq!(e.code(), ErrorCode::TypeConversion, "{e}");
}

#[test]
fn zero_values() {
    assert_eq!(TypedValue::new(FieldType::Bool).to_string(), "0");
    assert_eq!(TypedValue::new(FieldType::Long).to_string(), "0");
    assert_eq!(TypedValue::new(FieldType::Double).to_string(), "0");
    assert_eq!(TypedValue::new(FieldType::String).to_string(), "");
    assert_eq!(TypedValue::new(FieldType::Datetime).to_string(), "0");
}

#[test]
fn from_bool() {
    assert_eq!(render(FieldType::Bool, true), "1");
    assert_eq!(render(FieldType::Int, true), "1");
    assert_eq!(render(FieldType::Long, false), "0");
    assert_eq!(render(FieldType::Double, true), "1");
    assert_eq!(render(FieldType::String, true), "True");
    assert_eq!(render(FieldType::String, false), "False");
    fails(FieldType::Datetime, true);
}

#[test]
fn from_integer() {
    assert_eq!(render(FieldType::Bool, 7), "1");
    assert_eq!(render(FieldType::Bool, 0), "0");
    assert_eq!(render(FieldType::Long, -42i64), "-42");
    assert_eq!(render(FieldType::Double, 42), "42");
    assert_eq!(render(FieldType::String, 42u8), "42");
    assert_eq!(render(FieldType::Datetime, TS), TS.to_string());
}

#[test]
fn from_float() {
    assert_eq!(render(FieldType::Bool, 0.5), "1");
    assert_eq!(render(FieldType::Bool, 0.0), "0");
    assert_eq!(render(FieldType::Long, 3.9), "3");
    assert_eq!(render(FieldType::Int, -3.9), "-3");
    assert_eq!(render(FieldType::Double, 1000.5), "1000.5");
    assert_eq!(render(FieldType::String, 1000.5), "1000.5");
    fails(FieldType::Datetime, 1.5);
    fails(FieldType::Long, f64::NAN);
}

#[test]
fn float_outside_integer_range_fails() {
    fails(FieldType::Long, 1e30);
    fails(FieldType::Long, -1e30);
    fails(FieldType::Int, 9.3e18);
    assert_eq!(render(FieldType::Long, -9.0e18), "-9000000000000000000");
    assert_eq!(render(FieldType::Long, 9.0e18), "9000000000000000000");
}

#[test]
fn float_precision_policy() {
    assert_eq!(render(FieldType::Double, 42.0), "42");
    assert_eq!(render(FieldType::Double, 0.1), "0.1");
    assert_eq!(render(FieldType::Float, 0.1), "0.1");
    assert_eq!(render(FieldType::Float, 0.1f32), "0.1");
    assert_eq!(render(FieldType::Double, f64::INFINITY), "+Inf");
    assert_eq!(render(FieldType::Double, f64::NEG_INFINITY), "-Inf");
    assert_eq!(render(FieldType::Double, f64::NAN), "NaN");
}

#[test]
fn from_text() {
    for t in ["+", "True", "true", "Yes", "yes", "On", "on", "Enabled", "enabled"] {
        assert_eq!(render(FieldType::Bool, t), "1", "token {t}");
    }
    for t in ["TRUE", "1", "off", ""] {
        assert_eq!(render(FieldType::Bool, t), "0", "token {t}");
    }

    assert_eq!(render(FieldType::Long, " 17 "), "17");
    fails(FieldType::Long, "abc");
    fails(FieldType::Int, "");

    assert_eq!(render(FieldType::Double, "2.5"), "2.5");
    fails(FieldType::Double, "two");

    assert_eq!(render(FieldType::String, "EURUSD"), "EURUSD");

    assert_eq!(render(FieldType::Datetime, "2024.01.02 03:04:05"), TS.to_string());
    assert_eq!(render(FieldType::Datetime, "2024-01-02T03:04:05Z"), TS.to_string());
    assert_eq!(render(FieldType::Datetime, "2024.01.02"), "1704153600");
    fails(FieldType::Datetime, "yesterday");
}

#[test]
fn from_timestamp() {
    let ts = Timestamp::from_epoch(TS);

    fails(FieldType::Bool, ts);
    fails(FieldType::Short, ts);
    fails(FieldType::Int, ts);
    fails(FieldType::UInt, ts);
    fails(FieldType::Double, ts);

    assert_eq!(render(FieldType::Long, ts), TS.to_string());
    assert_eq!(render(FieldType::ULong, ts), TS.to_string());
    assert_eq!(render(FieldType::String, ts), "2024.01.02 03:04");
    assert_eq!(render(FieldType::Datetime, ts), TS.to_string());
}

#[test]
fn failed_set_keeps_previous_value() {
    let mut v = TypedValue::with_value(FieldType::Long, 5).unwrap();
    assert!(v.set("abc").is_err());
    assert_eq!(v.to_string(), "5");
    assert_eq!(v.value(), &Scalar::Int(5));
}

#[test]
fn declared_type_is_fixed() {
    let mut v = TypedValue::new(FieldType::Double);
    v.set(3).unwrap();
    assert_eq!(v.declared(), FieldType::Double);
    assert_eq!(v.value(), &Scalar::Float(3.0));
}

#[test]
fn field_type_names() {
    assert_eq!("datetime".parse::<FieldType>().unwrap(), FieldType::Datetime);
    assert_eq!("ulong".parse::<FieldType>().unwrap(), FieldType::ULong);
    let e = "decimal".parse::<FieldType>().unwrap_err();
    assert_eq!(e.code(), ErrorCode::Config);
}
