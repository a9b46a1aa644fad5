use super::{Formatter, ToSql};

/// A positional parameter.
pub(super) struct Placeholder;

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.params += 1;
        f.dst.push('?');
    }
}
