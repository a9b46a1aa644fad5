use crate::stmt::{Row, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,

    /// Key generated by an insert, if the database produced one
    pub generated_key: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, fully materialized
    Values(Vec<Row>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            generated_key: None,
        }
    }

    pub fn values(rows: Vec<Row>) -> Self {
        Self {
            rows: Rows::Values(rows),
            generated_key: None,
        }
    }

    pub fn inserted(count: u64, generated_key: Option<Value>) -> Self {
        Self {
            rows: Rows::Count(count),
            generated_key,
        }
    }
}

impl Rows {
    /// Returns the affected row count, failing for a row set.
    pub fn into_count(self) -> crate::Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            Rows::Values(_) => Err(crate::Error::persistence(
                "expected an affected-row count, got a row set",
            )),
        }
    }

    /// Returns the rows, failing for an affected row count.
    pub fn into_values(self) -> crate::Result<Vec<Row>> {
        match self {
            Rows::Values(rows) => Ok(rows),
            Rows::Count(_) => Err(crate::Error::persistence(
                "expected a row set, got an affected-row count",
            )),
        }
    }
}
