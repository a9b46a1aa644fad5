use crate::Result;

use rowbind_core::stmt::{Type, Value};

/// A field type with an entry in the conversion table.
///
/// `load` receives the value already narrowed to [`Primitive::TYPE`] by the
/// row mapper, or `Value::Null` for a NULL column.
pub trait Primitive: Sized {
    const TYPE: Type;

    fn load(value: Value) -> Result<Self>;

    fn into_value(self) -> Value;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $variant:ident, )* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: Type = Type::$variant;

                fn load(value: Value) -> Result<Self> {
                    value.try_into()
                }

                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    f32 => F32,
    f64 => F64,
    i32 => I32,
    i64 => I64,
    String => String,
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: Type = T::TYPE;

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => Ok(Some(T::load(value)?)),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

/// An enumeration stored as its variant's integer ordinal.
///
/// Decoding scans [`Enumeration::VARIANTS`] in order and picks the first
/// variant whose ordinal matches; a stored ordinal with no match reads back as
/// `None`.
pub trait Enumeration: Clone + 'static {
    const VARIANTS: &'static [Self];

    fn ordinal(&self) -> i32;

    fn from_ordinal(ordinal: i32) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|variant| variant.ordinal() == ordinal)
            .cloned()
    }
}
