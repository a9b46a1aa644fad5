use super::{Formatter, ToSql};

use rowbind_core::schema::Table;

/// A column or table name, written verbatim.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self.0.as_ref());
    }
}

impl ToSql for &Table {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(schema) = &self.schema {
            fmt!(f, Ident(schema), ".");
        }
        fmt!(f, Ident(&self.name));
    }
}
