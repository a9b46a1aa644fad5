use super::Statement;

use rowbind_core::schema::Table;

/// Updates one row by identity. The assignments take placeholders
/// `1..=columns.len()`, the identity takes the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Table,
    pub columns: Vec<String>,
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}
