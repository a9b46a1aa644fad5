use crate::stmt::Value;

/// An operation sent to a [`Connection`](super::Connection).
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Prepare a statement ahead of its first execution. Responds with a
    /// zero count.
    Prepare(Prepare),

    /// Execute a query returning rows.
    QuerySql(QuerySql),

    /// Execute a statement returning an affected-row count.
    ExecSql(ExecSql),

    /// Execute an insert, returning the affected-row count and the generated
    /// key.
    Insert(Insert),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prepare {
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySql {
    pub sql: String,

    /// Positional parameters; `params[0]` binds placeholder 1
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecSql {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Operation {
    /// The SQL text the operation carries.
    pub fn sql(&self) -> &str {
        match self {
            Operation::Prepare(op) => &op.sql,
            Operation::QuerySql(op) => &op.sql,
            Operation::ExecSql(op) => &op.sql,
            Operation::Insert(op) => &op.sql,
        }
    }

    /// The bound parameters; empty for `Prepare`.
    pub fn params(&self) -> &[Value] {
        match self {
            Operation::Prepare(_) => &[],
            Operation::QuerySql(op) => &op.params,
            Operation::ExecSql(op) => &op.params,
            Operation::Insert(op) => &op.params,
        }
    }

    pub fn is_query_sql(&self) -> bool {
        matches!(self, Operation::QuerySql(_))
    }
}

impl From<Prepare> for Operation {
    fn from(value: Prepare) -> Self {
        Self::Prepare(value)
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}

impl From<ExecSql> for Operation {
    fn from(value: ExecSql) -> Self {
        Self::ExecSql(value)
    }
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
