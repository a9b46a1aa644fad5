mod binds;
use binds::Binds;

mod mapper;

mod resolve;
pub(crate) use resolve::{find_all_later, find_later, Path, Resolve};

use crate::{
    schema::{Mapped, Model},
    stmt::{Conversion, Primitive},
    Entity, Error, Result, Session,
};

use rowbind_core::{
    driver::{
        operation::{ExecSql, Insert, Prepare, QuerySql},
        Response,
    },
    err,
    stmt::{Row, Value},
};
use rowbind_sql::{Serializer, Sql, Statement};

use std::{fmt, rc::Rc};

/// Typed access to the rows of one entity type.
///
/// A repository is a cheap handle: the mapping and prepared statements
/// behind it are built once per entity type per [`Session`] and shared by
/// every handle obtained from that session.
pub struct Repository<E: Entity> {
    session: Session,
    engine: Rc<Engine<E>>,
}

/// Mapping and prepared statements of one entity type.
pub(crate) struct Engine<E> {
    model: Model<E>,
    statements: Statements,
}

/// The six statements every engine prepares up front.
struct Statements {
    select_all: Sql,
    select: Sql,
    insert: Sql,
    update: Sql,
    delete: Sql,
    exists: Sql,
}

impl<E: Entity> Repository<E> {
    pub fn new(session: &Session) -> Result<Repository<E>> {
        Ok(Repository {
            session: session.clone(),
            engine: session.engine()?,
        })
    }

    /// A repository over the process-wide shared connection.
    ///
    /// See [`connection::install`](crate::connection::install).
    pub fn of() -> Result<Repository<E>> {
        Repository::new(&Session::shared()?)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn model(&self) -> &Model<E> {
        &self.engine.model
    }

    /// Loads every row of the table.
    pub fn find_all(&self) -> Result<Vec<E>> {
        self.engine
            .find_all(&self.session, &Path::default())
            .map_err(|e| e.context(self.engine.op_context("find_all")))
    }

    /// Loads the entity with the given identity.
    pub fn find(&self, id: &E::Key) -> Result<Option<E>> {
        self.engine
            .find(&self.session, &Path::default(), id)
            .map_err(|e| e.context(self.engine.op_context("find")))
    }

    /// Inserts the entity, cascading to its relations first.
    ///
    /// Returns the entity with its generated identity, or `None` if the
    /// insert affected no row or produced no key.
    pub fn save(&self, entity: E) -> Result<Option<E>> {
        self.engine
            .save(&self.session, entity)
            .map_err(|e| e.context(self.engine.op_context("save")))
    }

    /// Saves each entity in order.
    pub fn save_all(&self, entities: impl IntoIterator<Item = E>) -> Result<Vec<Option<E>>> {
        entities
            .into_iter()
            .map(|entity| self.save(entity))
            .collect()
    }

    /// Writes every mapped column of the entity to the row with its
    /// identity. Returns the entity if exactly one row was updated.
    pub fn update(&self, entity: E) -> Result<Option<E>> {
        self.engine
            .update(&self.session, entity)
            .map_err(|e| e.context(self.engine.op_context("update")))
    }

    /// Updates each entity in order.
    pub fn update_all(&self, entities: impl IntoIterator<Item = E>) -> Result<Vec<Option<E>>> {
        entities
            .into_iter()
            .map(|entity| self.update(entity))
            .collect()
    }

    /// Updates the entity if it exists in storage, saves it otherwise.
    pub fn save_or_update(&self, entity: E) -> Result<Option<E>> {
        self.engine
            .save_or_update(&self.session, entity)
            .map_err(|e| e.context(self.engine.op_context("save_or_update")))
    }

    /// Deletes the entity's row. An entity without identity deletes nothing.
    pub fn delete(&self, entity: &E) -> Result<bool> {
        self.engine
            .delete_value(&self.session, identity_value(entity.id()))
            .map_err(|e| e.context(self.engine.op_context("delete")))
    }

    pub fn delete_by_id(&self, id: &E::Key) -> Result<bool> {
        self.engine
            .delete_value(&self.session, id.clone().into_value())
            .map_err(|e| e.context(self.engine.op_context("delete_by_id")))
    }

    /// Loads the first entity whose `column` equals `value`.
    ///
    /// `column` must be a mapped column name; anything else fails before a
    /// query is issued.
    pub fn find_by_column(&self, column: &str, value: impl Into<Value>) -> Result<Option<E>> {
        self.engine
            .find_by_column(&self.session, column, value.into(), true)
            .map(|mut found| found.pop())
            .map_err(|e| e.context(self.engine.op_context("find_by_column")))
    }

    /// Loads every entity whose `column` equals `value`.
    pub fn find_all_by_column(&self, column: &str, value: impl Into<Value>) -> Result<Vec<E>> {
        self.engine
            .find_by_column(&self.session, column, value.into(), false)
            .map_err(|e| e.context(self.engine.op_context("find_all_by_column")))
    }

    /// Returns `true` if a row with the identity exists.
    ///
    /// A missing identity is never stored, so `None` returns `false` without
    /// a query. Failures are reported as absence; use
    /// [`Repository::try_exists`] to observe them.
    pub fn exists(&self, id: Option<&E::Key>) -> bool {
        self.engine.exists(&self.session, id)
    }

    pub fn try_exists(&self, id: &E::Key) -> Result<bool> {
        self.engine
            .try_exists(&self.session, id)
            .map_err(|e| e.context(self.engine.op_context("exists")))
    }
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Repository {
            session: self.session.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<E: Entity> fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &std::any::type_name::<E>())
            .field("table", &self.engine.model.table().qualified_name())
            .finish()
    }
}

impl<E: Entity> Engine<E> {
    /// Builds the mapping and prepares its statements on the session's
    /// connection.
    pub(crate) fn new(session: &Session) -> Result<Engine<E>> {
        let model = Model::<E>::build()?;
        let table = model.table();
        let serializer = Serializer::new();

        let statements = Statements {
            select_all: serializer.serialize(&Statement::select_all(table)),
            select: serializer.serialize(&Statement::select_by_id(table)),
            insert: serializer.serialize(&Statement::insert(table, model.stored_columns())),
            update: serializer.serialize(&Statement::update(table, model.stored_columns())),
            delete: serializer.serialize(&Statement::delete(table)),
            exists: serializer.serialize(&Statement::exists(table)),
        };

        debug_assert_eq!(statements.insert.params, model.scalar_count());
        debug_assert_eq!(statements.update.params, model.scalar_count() + 1);

        for sql in statements.iter() {
            session
                .exec(Prepare {
                    sql: sql.text.clone(),
                }
                .into())
                .map_err(|e| e.context(err!("failed to prepare `{sql}`")))?;
        }

        log::debug!(
            target: "rowbind::sql",
            "prepared statements; entity={}, table={}",
            std::any::type_name::<E>(),
            table
        );

        Ok(Engine { model, statements })
    }

    fn op_context(&self, op: &str) -> Error {
        err!("{}.{op}()", self.model.table())
    }

    pub(crate) fn find_all(&self, session: &Session, path: &Path) -> Result<Vec<E>> {
        let rows = self.query(session, &self.statements.select_all, vec![])?;
        self.map_rows(session, path, rows)
    }

    pub(crate) fn find(&self, session: &Session, path: &Path, id: &E::Key) -> Result<Option<E>> {
        self.find_value(session, path, id.clone().into_value())
    }

    pub(crate) fn find_value(
        &self,
        session: &Session,
        path: &Path,
        key: Value,
    ) -> Result<Option<E>> {
        let mut rows = self.query(session, &self.statements.select, vec![key])?;

        match rows.pop() {
            Some(row) => Ok(Some(self.map_row(session, path, &row)?)),
            None => Ok(None),
        }
    }

    /// Public by-column lookup: the column must be mapped.
    fn find_by_column(
        &self,
        session: &Session,
        column: &str,
        value: Value,
        limit_one: bool,
    ) -> Result<Vec<E>> {
        match self.model.column(column) {
            Some(mapped) if mapped.is_stored() => {}
            Some(_) => {
                return Err(Error::schema_mapping(format!(
                    "column `{column}` of `{}` is stored by the related table",
                    self.model.table()
                )));
            }
            None => {
                return Err(Error::schema_mapping(format!(
                    "column `{column}` is not mapped on `{}`",
                    self.model.table()
                )));
            }
        }

        self.query_by_column(session, &Path::default(), column, value, limit_one)
    }

    /// By-column lookup without the mapping check. One-to-many resolution
    /// queries the owner's key under a column the related entity may not map.
    pub(crate) fn query_by_column(
        &self,
        session: &Session,
        path: &Path,
        column: &str,
        value: Value,
        limit_one: bool,
    ) -> Result<Vec<E>> {
        let table = self.model.table();

        let stmt = if limit_one {
            Statement::select_by_column(table, column)
        } else {
            Statement::select_all_by_column(table, column)
        };

        let sql = Serializer::new().serialize(&stmt);
        let rows = self.query(session, &sql, vec![value])?;
        self.map_rows(session, path, rows)
    }

    pub(crate) fn save(&self, session: &Session, mut entity: E) -> Result<Option<E>> {
        let params = self.bind(session, &mut entity, &self.statements.insert, None)?;

        let Response {
            rows,
            generated_key,
        } = session.exec(
            Insert {
                sql: self.statements.insert.text.clone(),
                params,
            }
            .into(),
        )?;

        if rows.into_count()? != 1 {
            return Ok(None);
        }

        let Some(key) = generated_key else {
            return Ok(None);
        };

        let id = match E::Key::TYPE.convert(key)? {
            Conversion::Value(key) => E::Key::load(key)?,
            Conversion::Unsupported(ty) => {
                return Err(Error::schema_mapping(format!(
                    "identity type `{ty}` of `{}` has no conversion",
                    std::any::type_name::<E>()
                )));
            }
        };

        entity.set_id(Some(id));
        Ok(Some(entity))
    }

    pub(crate) fn update(&self, session: &Session, mut entity: E) -> Result<Option<E>> {
        let id = identity_value(entity.id());
        let params = self.bind(session, &mut entity, &self.statements.update, Some(id))?;

        let count = self.execute(session, &self.statements.update, params)?;
        Ok((count == 1).then_some(entity))
    }

    pub(crate) fn save_or_update(&self, session: &Session, entity: E) -> Result<Option<E>> {
        if self.exists(session, entity.id()) {
            self.update(session, entity)
        } else {
            self.save(session, entity)
        }
    }

    fn delete_value(&self, session: &Session, key: Value) -> Result<bool> {
        let count = self.execute(session, &self.statements.delete, vec![key])?;
        Ok(count > 0)
    }

    pub(crate) fn exists(&self, session: &Session, id: Option<&E::Key>) -> bool {
        match id {
            Some(id) => absent_on_failure(self.try_exists(session, id)),
            None => false,
        }
    }

    pub(crate) fn try_exists(&self, session: &Session, id: &E::Key) -> Result<bool> {
        let rows = self.query(
            session,
            &self.statements.exists,
            vec![id.clone().into_value()],
        )?;

        match rows.first().and_then(|row| row.get_index(0)) {
            Some(value) => value.clone().to_bool(),
            None => Err(Error::persistence(format!(
                "existence check on `{}` returned no row",
                self.model.table()
            ))),
        }
    }

    /// Binds the stored columns in mapping order, cascading each relation
    /// first. `id`, when given, is bound after the columns.
    fn bind(
        &self,
        session: &Session,
        entity: &mut E,
        sql: &Sql,
        id: Option<Value>,
    ) -> Result<Vec<Value>> {
        let mut binds = Binds::new(sql.params);
        let mut position = 0;

        for column in self.model.columns() {
            let value = match column.mapped() {
                Mapped::Scalar(field) => Some(field.read(entity)),
                Mapped::Relation(relation) => relation
                    .cascade(session, entity)
                    .map_err(|e| e.context(err!("cascade of `{}` failed", column.field())))?,
            };

            if let Some(value) = value {
                position += 1;
                binds.bind(position, value)?;
            }
        }

        if let Some(id) = id {
            binds.bind(self.model.scalar_count() + 1, id)?;
        }

        binds.finish()
    }

    fn query(&self, session: &Session, sql: &Sql, params: Vec<Value>) -> Result<Vec<Row>> {
        session
            .exec(
                QuerySql {
                    sql: sql.text.clone(),
                    params,
                }
                .into(),
            )?
            .rows
            .into_values()
    }

    fn execute(&self, session: &Session, sql: &Sql, params: Vec<Value>) -> Result<u64> {
        session
            .exec(
                ExecSql {
                    sql: sql.text.clone(),
                    params,
                }
                .into(),
            )?
            .rows
            .into_count()
    }
}

impl Statements {
    fn iter(&self) -> impl Iterator<Item = &Sql> {
        [
            &self.select_all,
            &self.select,
            &self.insert,
            &self.update,
            &self.delete,
            &self.exists,
        ]
        .into_iter()
    }
}

fn identity_value<K: Primitive + Clone>(id: Option<&K>) -> Value {
    id.cloned().map(Primitive::into_value).unwrap_or_default()
}

/// Turns a failed existence check into "absent".
fn absent_on_failure(result: Result<bool>) -> bool {
    result.unwrap_or_else(|e| {
        log::warn!(target: "rowbind::sql", "existence check failed, reporting absent; error={e}");
        false
    })
}
