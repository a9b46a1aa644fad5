use super::Statement;

use rowbind_core::schema::Table;

/// Selects every column of a table, optionally filtered on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: Table,
    pub filter: Option<Filter>,

    /// Appends `limit 1`
    pub limit_one: bool,
}

/// `<column> = ?`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>) -> Filter {
        Filter {
            column: column.into(),
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}
