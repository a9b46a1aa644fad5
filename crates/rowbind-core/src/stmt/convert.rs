use super::{
    value_chrono::{parse_date, parse_date_time},
    Type, Value,
};
use crate::{Error, Result};

/// Outcome of converting a raw column value to a declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// The value, narrowed to the declared type. `Value::Null` stays null.
    Value(Value),

    /// The declared type has no entry in the conversion table. The field is
    /// left absent.
    Unsupported(Type),
}

impl Conversion {
    /// Returns the converted value, or `None` when the type is unsupported.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Conversion::Value(value) => Some(value),
            Conversion::Unsupported(_) => None,
        }
    }
}

impl Type {
    /// Converts a raw column value, as reported by the driver, to this type.
    ///
    /// Fails with a type conversion error when the stored value cannot
    /// represent the declared type (text in an integer field, an integer out
    /// of `i32` range, an unparsable date).
    pub fn convert(&self, raw: Value) -> Result<Conversion> {
        let value = match self {
            Type::Custom(_) => return Ok(Conversion::Unsupported(*self)),
            _ if raw.is_null() => Value::Null,
            Type::String => match raw {
                Value::String(v) => Value::String(v),
                Value::I32(v) => Value::String(v.to_string()),
                Value::I64(v) => Value::String(v.to_string()),
                Value::F64(v) => Value::String(v.to_string()),
                other => return Err(Error::type_conversion(other, "String")),
            },
            Type::I32 => Value::I32(i32::try_from(raw)?),
            Type::I64 => Value::I64(i64::try_from(raw)?),
            Type::F32 => Value::F32(f32::try_from(raw)?),
            Type::F64 => Value::F64(f64::try_from(raw)?),
            Type::Bool => Value::Bool(raw.to_bool()?),
            Type::Date => match raw {
                Value::Date(v) => Value::Date(v),
                Value::String(v) => Value::Date(parse_date(&v)?),
                other => return Err(Error::type_conversion(other, "NaiveDate")),
            },
            Type::DateTime => match raw {
                Value::DateTime(v) => Value::DateTime(v),
                Value::String(v) => Value::DateTime(parse_date_time(&v)?),
                other => return Err(Error::type_conversion(other, "NaiveDateTime")),
            },
            Type::Enum => Value::I32(i32::try_from(raw)?),
        };

        Ok(Conversion::Value(value))
    }
}
