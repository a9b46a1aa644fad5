use super::Statement;

use rowbind_core::schema::Table;

/// Inserts one row. One placeholder per column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Table,
    pub columns: Vec<String>,
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}
