use super::Statement;

use rowbind_core::schema::Table;

/// Tests whether a row with a given identity is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Exists {
    pub table: Table,
}

impl From<Exists> for Statement {
    fn from(value: Exists) -> Self {
        Statement::Exists(value)
    }
}
