//! Raw values and the typed [`FieldValue`] wrapper.
//!
//! [`Value`] is the untyped payload a database row hands back. [`FieldValue`]
//! pairs it with its [`Field`] descriptor and offers conversions that check
//! the field's declared type first and the runtime variant second, so a
//! mismatch surfaces as a typed error instead of a silent coercion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CrudError, Result};
use crate::field::{Field, FieldType};

/// An untyped scalar as produced by a database driver.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Decimal(Decimal),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Value {
    /// True when the value is null or the type's zero value (`0`, `0.0`,
    /// `""`, `false`, nil UUID, epoch, JSON null).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Bool(b) => !b,
            Value::Decimal(d) => d.is_zero(),
            Value::Uuid(u) => u.is_nil(),
            Value::DateTime(dt) => *dt == DateTime::<Utc>::UNIX_EPOCH,
            Value::Json(v) => v.is_null(),
        }
    }

    /// Best-effort JSON representation of the value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Decimal(d) => serde_json::Value::String(d.to_string()),
            Value::Uuid(u) => serde_json::Value::String(u.to_string()),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Json(v) => v.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A field descriptor paired with a raw value.
///
/// Immutable: "setting" a new value means constructing a new `FieldValue`
/// via [`Field::value`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldValue {
    field: Field,
    value: Value,
}

impl FieldValue {
    pub(crate) fn new(field: Field, value: Value) -> Self {
        Self { field, value }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// True when the value is null or its type's zero value.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Same value carried by a field renamed to `name`.
    pub(crate) fn renamed(&self, name: &str) -> FieldValue {
        FieldValue::new(self.field.renamed(name), self.value.clone())
    }

    fn check_type(&self, want: FieldType, expected: &'static str) -> Result<()> {
        if self.field.field_type() != want {
            return Err(self.mismatch(expected));
        }
        Ok(())
    }

    fn mismatch(&self, expected: &'static str) -> CrudError {
        CrudError::FieldMismatch {
            field: self.field.name().to_string(),
            actual: self.field.field_type(),
            expected,
        }
    }

    fn cast_error(&self, expected: &'static str) -> CrudError {
        CrudError::ValueCast {
            field: self.field.name().to_string(),
            expected,
        }
    }

    pub fn as_string(&self) -> Result<String> {
        self.check_type(FieldType::String, "string")?;
        match &self.value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.clone()),
            _ => Err(self.cast_error("string")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.check_type(FieldType::Int, "int")?;
        match &self.value {
            Value::Null => Ok(0),
            Value::Int(i) => Ok(*i),
            _ => Err(self.cast_error("int")),
        }
    }

    pub fn as_i32(&self) -> Result<i32> {
        self.check_type(FieldType::Int, "int32")?;
        match &self.value {
            Value::Null => Ok(0),
            Value::Int(i) => i32::try_from(*i).map_err(|_| self.cast_error("int32")),
            _ => Err(self.cast_error("int32")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.check_type(FieldType::Bool, "bool")?;
        match &self.value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            _ => Err(self.cast_error("bool")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.check_type(FieldType::Float, "float64")?;
        match &self.value {
            Value::Null => Ok(0.0),
            Value::Float(f) => Ok(*f),
            _ => Err(self.cast_error("float64")),
        }
    }

    pub fn as_f32(&self) -> Result<f32> {
        self.check_type(FieldType::Float, "float32")?;
        match &self.value {
            Value::Null => Ok(0.0),
            Value::Float(f) => Ok(*f as f32),
            _ => Err(self.cast_error("float32")),
        }
    }

    /// Decimal conversion accepts decimal, int, float and parseable string
    /// values.
    pub fn as_decimal(&self) -> Result<Decimal> {
        self.check_type(FieldType::Decimal, "decimal")?;
        match &self.value {
            Value::Null => Ok(Decimal::ZERO),
            Value::Decimal(d) => Ok(*d),
            Value::Int(i) => Ok(Decimal::from(*i)),
            Value::Float(f) => Decimal::from_f64_retain(*f).ok_or_else(|| self.cast_error("decimal")),
            Value::String(s) => s.parse().map_err(|_| self.cast_error("decimal")),
            _ => Err(self.cast_error("decimal")),
        }
    }

    /// Accepts any of the four temporal field types.
    pub fn as_datetime(&self) -> Result<DateTime<Utc>> {
        if !self.field.field_type().is_temporal() {
            return Err(self.mismatch("datetime"));
        }
        match &self.value {
            Value::Null => Ok(DateTime::<Utc>::UNIX_EPOCH),
            Value::DateTime(dt) => Ok(*dt),
            _ => Err(self.cast_error("datetime")),
        }
    }

    pub fn as_uuid(&self) -> Result<Uuid> {
        self.check_type(FieldType::Uuid, "uuid")?;
        match &self.value {
            Value::Null => Ok(Uuid::nil()),
            Value::Uuid(u) => Ok(*u),
            _ => Err(self.cast_error("uuid")),
        }
    }

    /// JSON conversion parses string values and passes JSON values through;
    /// other scalars are converted via [`Value::to_json`].
    pub fn as_json(&self) -> Result<serde_json::Value> {
        self.check_type(FieldType::Json, "json")?;
        match &self.value {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Json(v) => Ok(v.clone()),
            Value::String(s) => Ok(serde_json::from_str(s)?),
            other => Ok(other.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_conversion_roundtrip() {
        let fv = Field::string("name").value("Sedan");
        assert_eq!(fv.as_string().unwrap(), "Sedan");
        assert!(!fv.is_zero());
    }

    #[test]
    fn null_converts_to_zero_value() {
        assert_eq!(Field::string("name").value(Value::Null).as_string().unwrap(), "");
        assert_eq!(Field::int("id").value(Value::Null).as_i64().unwrap(), 0);
        assert!(!Field::boolean("active").value(Value::Null).as_bool().unwrap());
        assert_eq!(Field::uuid("id").value(Value::Null).as_uuid().unwrap(), Uuid::nil());
    }

    #[test]
    fn declared_type_mismatch_is_a_typed_error() {
        let fv = Field::int("id").value(5);
        match fv.as_string() {
            Err(CrudError::FieldMismatch { field, actual, expected }) => {
                assert_eq!(field, "id");
                assert_eq!(actual, FieldType::Int);
                assert_eq!(expected, "string");
            }
            other => panic!("expected FieldMismatch, got {other:?}"),
        }
    }

    #[test]
    fn wrong_runtime_variant_is_a_cast_error() {
        let fv = Field::int("id").value("not a number");
        assert!(matches!(fv.as_i64(), Err(CrudError::ValueCast { .. })));
    }

    #[test]
    fn i32_conversion_checks_range() {
        assert_eq!(Field::int("n").value(41i64).as_i32().unwrap(), 41);
        let big = Field::int("n").value(i64::MAX);
        assert!(matches!(big.as_i32(), Err(CrudError::ValueCast { .. })));
    }

    #[test]
    fn decimal_accepts_int_float_and_string() {
        assert_eq!(
            Field::decimal("price").value(12i64).as_decimal().unwrap(),
            Decimal::from(12)
        );
        assert_eq!(
            Field::decimal("price").value("10.25").as_decimal().unwrap(),
            "10.25".parse::<Decimal>().unwrap()
        );
        assert!(
            Field::decimal("price")
                .value(true)
                .as_decimal()
                .is_err()
        );
    }

    #[test]
    fn datetime_accepts_all_temporal_field_types() {
        let now = Utc::now();
        for field in [
            Field::date("d"),
            Field::time("t"),
            Field::datetime("dt"),
            Field::timestamp("ts"),
        ] {
            assert_eq!(field.value(now).as_datetime().unwrap(), now);
        }
        assert!(Field::string("s").value(now.to_rfc3339()).as_datetime().is_err());
    }

    #[test]
    fn json_parses_string_values() {
        let fv = Field::json("data").value(r#"{"a":1}"#);
        assert_eq!(fv.as_json().unwrap(), serde_json::json!({"a": 1}));

        let invalid = Field::json("data").value("not json");
        assert!(matches!(invalid.as_json(), Err(CrudError::Json(_))));
    }

    #[test]
    fn zero_values_are_zero() {
        assert!(Value::Null.is_zero());
        assert!(Value::Int(0).is_zero());
        assert!(Value::String(String::new()).is_zero());
        assert!(Value::Bool(false).is_zero());
        assert!(!Value::Int(1).is_zero());
        assert!(!Value::String("x".into()).is_zero());
        assert!(!Value::Bool(true).is_zero());
    }
}
