#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod ident;
use ident::Ident;

mod placeholder;
use placeholder::Placeholder;

mod statement;

use crate::stmt::Statement;

/// Rendered SQL text and the number of positional placeholders it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sql {
    pub text: String,
    pub params: usize,
}

/// Serializes statements to SQL text.
///
/// Placeholders are rendered as bare `?` and numbered implicitly from 1 in
/// the order they appear.
#[derive(Debug, Default)]
pub struct Serializer {
    _priv: (),
}

struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Number of placeholders written so far
    params: usize,
}

impl Serializer {
    pub fn new() -> Serializer {
        Serializer::default()
    }

    pub fn serialize(&self, stmt: &Statement) -> Sql {
        let mut text = String::new();

        let mut f = Formatter {
            dst: &mut text,
            params: 0,
        };

        stmt.to_sql(&mut f);

        let params = f.params;
        Sql { text, params }
    }
}

impl core::fmt::Display for Sql {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.text)
    }
}
