pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

use crate::Result;

use std::{borrow::Cow, fmt::Debug};

/// Provisions database connections.
///
/// A driver is the connection factory installed for the process; it is asked
/// for a connection once, and that connection is shared from then on.
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver is connecting to.
    fn url(&self) -> Cow<'_, str>;

    /// Opens a new connection.
    fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// A single database connection.
///
/// Calls are synchronous and run to completion. A connection is not
/// re-entrant: callers serialize access.
pub trait Connection: Debug + Send + 'static {
    /// Executes an operation.
    fn exec(&mut self, op: Operation) -> Result<Response>;

    /// Runs one or more semicolon-separated statements without parameters,
    /// e.g. DDL while setting up a database.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;
}
