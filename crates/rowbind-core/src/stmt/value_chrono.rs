use chrono::{NaiveDate, NaiveDateTime};

use crate::{stmt::Value, Error};

macro_rules! impl_chrono_conversions {
    ($chrono:ty, $name:ident, $lit:literal) => {
        impl From<$chrono> for Value {
            fn from(value: $chrono) -> Self {
                Self::$name(value)
            }
        }

        impl From<&$chrono> for Value {
            fn from(value: &$chrono) -> Self {
                Self::$name(*value)
            }
        }

        impl TryFrom<Value> for $chrono {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$name(value) => Ok(value),
                    _ => Err(Error::type_conversion(value, $lit)),
                }
            }
        }
    };
}

impl_chrono_conversions!(NaiveDateTime, DateTime, "NaiveDateTime");
impl_chrono_conversions!(NaiveDate, Date, "NaiveDate");

/// Text layout used to store dates.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text layout used to store date-times. Fractional seconds are optional on
/// read.
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl Value {
    /// Renders a date or date-time in the text layout it is stored with.
    /// Other values are returned unchanged.
    pub fn into_storage_text(self) -> Value {
        match self {
            Value::Date(v) => Value::String(v.format(DATE_FORMAT).to_string()),
            Value::DateTime(v) => Value::String(v.format(DATE_TIME_FORMAT).to_string()),
            other => other,
        }
    }
}

pub(crate) fn parse_date(src: &str) -> crate::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(src, DATE_FORMAT)?)
}

pub(crate) fn parse_date_time(src: &str) -> crate::Result<NaiveDateTime> {
    // SQLite's own `datetime()` emits a space separator; ISO-8601 uses `T`.
    match NaiveDateTime::parse_from_str(src, DATE_TIME_FORMAT) {
        Ok(v) => Ok(v),
        Err(_) => Ok(NaiveDateTime::parse_from_str(src, "%Y-%m-%dT%H:%M:%S%.f")?),
    }
}
