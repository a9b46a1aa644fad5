use super::Statement;

use rowbind_core::schema::Table;

/// Deletes the row with a given identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: Table,
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
