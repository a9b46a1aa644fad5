use super::{Comma, Formatter, Ident, Placeholder, ToSql};

use crate::stmt::{self, Statement};
use rowbind_core::schema::ID_COLUMN;

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Exists(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "select * from ", &self.table);

        if let Some(filter) = &self.filter {
            fmt!(f, " where ", filter);
        }

        if self.limit_one {
            fmt!(f, " limit 1");
        }
    }
}

impl ToSql for &stmt::Filter {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.column), " = ", Placeholder);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.columns.is_empty() {
            fmt!(f, "insert into ", &self.table, " default values");
            return;
        }

        let columns = Comma(self.columns.iter().map(Ident));
        let values = Comma(self.columns.iter().map(|_| Placeholder));

        fmt!(
            f,
            "insert into ",
            &self.table,
            " (",
            columns,
            ") values (",
            values,
            ")"
        );
    }
}

struct Assignment<'a>(&'a str);

impl ToSql for Assignment<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(self.0), " = ", Placeholder);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        // Nothing to write; touch the identity so the statement still reports
        // whether the row exists.
        if self.columns.is_empty() {
            fmt!(
                f,
                "update ",
                &self.table,
                " set ",
                Ident(ID_COLUMN),
                " = ",
                Ident(ID_COLUMN),
                " where ",
                Ident(ID_COLUMN),
                " = ",
                Placeholder
            );
            return;
        }

        let assignments = Comma(self.columns.iter().map(|column| Assignment(column)));

        fmt!(
            f,
            "update ",
            &self.table,
            " set ",
            assignments,
            " where ",
            Ident(ID_COLUMN),
            " = ",
            Placeholder
        );
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(
            f,
            "delete from ",
            &self.table,
            " where ",
            Ident(ID_COLUMN),
            " = ",
            Placeholder
        );
    }
}

impl ToSql for &stmt::Exists {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(
            f,
            "select exists(select ",
            Ident(ID_COLUMN),
            " from ",
            &self.table,
            " where ",
            Ident(ID_COLUMN),
            " = ",
            Placeholder,
            ")"
        );
    }
}
