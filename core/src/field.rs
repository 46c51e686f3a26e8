//! Field descriptors: a column name paired with a semantic type tag.
//!
//! A [`Field`] describes one column of an entity. It carries no value of its
//! own; [`Field::value`] attaches a raw [`Value`] and produces a
//! [`FieldValue`](crate::value::FieldValue) with type-checked conversions.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, Value};

/// Semantic type tag of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Int,
    Bool,
    Float,
    Decimal,
    Date,
    Time,
    DateTime,
    Timestamp,
    Uuid,
    Json,
}

impl FieldType {
    /// Lowercase name used in error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Timestamp => "timestamp",
            FieldType::Uuid => "uuid",
            FieldType::Json => "json",
        }
    }

    /// True for the four temporal types.
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            FieldType::Date | FieldType::Time | FieldType::DateTime | FieldType::Timestamp
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single column descriptor.
///
/// Constructed with the per-type constructors and the chainable `.key()`
/// marker:
///
/// ```
/// use crudkit_core::field::Field;
///
/// let id = Field::int("id").key();
/// let name = Field::string("name");
/// assert_eq!(id.name(), "id");
/// assert!(id.is_key());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    field_type: FieldType,
    key: bool,
}

impl Field {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            key: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Decimal)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Time)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Timestamp)
    }

    pub fn uuid(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Uuid)
    }

    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Json)
    }

    /// Marks this field as (part of) the primary key.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_key(&self) -> bool {
        self.key
    }

    /// Attaches a raw value to this field, producing a [`FieldValue`].
    pub fn value(&self, value: impl Into<Value>) -> FieldValue {
        FieldValue::new(self.clone(), value.into())
    }

    /// Copy of this field under a different column name. Used when stripping
    /// relation prefixes off flat-row columns.
    pub(crate) fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: self.field_type,
            key: self.key,
        }
    }
}
