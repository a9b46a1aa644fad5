mod value;
pub(crate) use value::Value;

use rowbind_core::{
    driver::{operation::Operation, Driver, Response},
    stmt::Row,
    Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};
use url::Url;

/// Prepared statements kept per connection unless configured otherwise.
pub const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 64;

/// Provisions SQLite connections.
#[derive(Debug)]
pub struct Sqlite {
    target: Target,
    statement_cache_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL: `sqlite::memory:`
    /// or `sqlite:<path>`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::driver_operation_failed(err)
                .context(Error::configuration(format!("invalid connection URL; url={url_str}")))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::in_memory())
        } else {
            Ok(Self::open(url.path()))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            target: Target::InMemory,
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE_CAPACITY,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE_CAPACITY,
        }
    }

    /// Number of prepared statements each connection keeps cached.
    ///
    /// Every repository prepares six statements, so the capacity should cover
    /// six per entity type in use.
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.target == Target::InMemory
    }
}

impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match &self.target {
            Target::InMemory => Cow::Borrowed("sqlite::memory:"),
            Target::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn connect(&self) -> Result<Box<dyn rowbind_core::Connection>> {
        let connection = match &self.target {
            Target::File(path) => Connection::open(path)?,
            Target::InMemory => Connection::in_memory()?,
        };

        connection
            .connection
            .set_prepared_statement_cache_capacity(self.statement_cache_capacity);

        log::debug!("opened sqlite connection; url={}", self.url());
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }

    fn query(&mut self, sql: &str, params: Vec<rowbind_core::stmt::Value>) -> Result<Vec<Row>> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        let width = columns.len();

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);

                    for index in 0..width {
                        let value = row.get_ref(index).map_err(Error::driver_operation_failed)?;
                        items.push(Value::from_sql(value)?.into_inner());
                    }

                    ret.push(Row::new(columns.clone(), items));
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver_operation_failed(err)),
            }
        }

        Ok(ret)
    }

    fn execute(&mut self, sql: &str, params: Vec<rowbind_core::stmt::Value>) -> Result<u64> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        Ok(count as u64)
    }
}

impl rowbind_core::driver::Connection for Connection {
    fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Prepare(op) => {
                // Compiles the statement and leaves it in the connection's
                // statement cache; later executions of the same text reuse it.
                self.connection
                    .prepare_cached(&op.sql)
                    .map_err(Error::driver_operation_failed)?;

                Ok(Response::count(0))
            }
            Operation::QuerySql(op) => Ok(Response::values(self.query(&op.sql, op.params)?)),
            Operation::ExecSql(op) => Ok(Response::count(self.execute(&op.sql, op.params)?)),
            Operation::Insert(op) => {
                let count = self.execute(&op.sql, op.params)?;

                let generated_key = (count > 0).then(|| {
                    rowbind_core::stmt::Value::I64(self.connection.last_insert_rowid())
                });

                Ok(Response::inserted(count, generated_key))
            }
        }
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(Error::driver_operation_failed)
    }
}
