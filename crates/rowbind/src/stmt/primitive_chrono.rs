use super::Primitive;
use crate::Result;

use rowbind_core::stmt::{Type, Value};

impl Primitive for chrono::NaiveDate {
    const TYPE: Type = Type::Date;

    fn load(value: Value) -> Result<Self> {
        value.try_into()
    }

    fn into_value(self) -> Value {
        Value::Date(self)
    }
}

impl Primitive for chrono::NaiveDateTime {
    const TYPE: Type = Type::DateTime;

    fn load(value: Value) -> Result<Self> {
        value.try_into()
    }

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }
}
