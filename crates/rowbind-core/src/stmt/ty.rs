/// The declared semantic type of a mapped field.
///
/// The row mapper converts raw column values to one of these types. Every
/// variant except [`Type::Custom`] has an entry in the conversion table (see
/// [`Type::convert`](crate::stmt::Type::convert)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean, stored as an integer 0/1
    Bool,

    /// Calendar date, stored as `YYYY-MM-DD` text
    Date,

    /// Date and time, stored as `YYYY-MM-DD HH:MM:SS[.fff]` text
    DateTime,

    /// Enumeration, stored as the variant's integer ordinal
    Enum,

    /// 32-bit floating point number
    F32,

    /// 64-bit floating point number
    F64,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Text
    String,

    /// A user-defined type the conversion table has no entry for. Binding
    /// works through the type's own `Value` conversion; reading yields
    /// [`Conversion::Unsupported`](crate::stmt::Conversion::Unsupported).
    Custom(&'static str),
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Type::Custom(name) => f.write_str(name),
            other => core::fmt::Debug::fmt(other, f),
        }
    }
}
