mod delete;
pub use delete::Delete;

mod exists;
pub use exists::Exists;

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Filter, Select};

mod update;
pub use update::Update;

use rowbind_core::schema::{Table, ID_COLUMN};

/// A statement the engine issues against an entity's table.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Delete(Delete),
    Exists(Exists),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    /// `select * from T`
    pub fn select_all(table: &Table) -> Statement {
        Select {
            table: table.clone(),
            filter: None,
            limit_one: false,
        }
        .into()
    }

    /// `select * from T where id = ? limit 1`
    pub fn select_by_id(table: &Table) -> Statement {
        Self::select_by_column(table, ID_COLUMN)
    }

    /// `select * from T where <column> = ? limit 1`
    pub fn select_by_column(table: &Table, column: impl Into<String>) -> Statement {
        Select {
            table: table.clone(),
            filter: Some(Filter::eq(column)),
            limit_one: true,
        }
        .into()
    }

    /// `select * from T where <column> = ?`
    pub fn select_all_by_column(table: &Table, column: impl Into<String>) -> Statement {
        Select {
            table: table.clone(),
            filter: Some(Filter::eq(column)),
            limit_one: false,
        }
        .into()
    }

    /// `insert into T (c1, c2) values (?, ?)`
    pub fn insert<I, S>(table: &Table, columns: I) -> Statement
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Insert {
            table: table.clone(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    /// `update T set c1 = ?, c2 = ? where id = ?`
    pub fn update<I, S>(table: &Table, columns: I) -> Statement
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Update {
            table: table.clone(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    /// `delete from T where id = ?`
    pub fn delete(table: &Table) -> Statement {
        Delete {
            table: table.clone(),
        }
        .into()
    }

    /// `select exists(select id from T where id = ?)`
    pub fn exists(table: &Table) -> Statement {
        Exists {
            table: table.clone(),
        }
        .into()
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Select(_) | Statement::Exists(_))
    }
}
