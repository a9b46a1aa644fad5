use crate::{connection, repository::Engine, Entity, Error, Repository, Result};

use rowbind_core::{
    driver::{Operation, Response},
    Connection,
};

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::Rc,
    sync::{Arc, Mutex},
};

/// A connection shared by every session that uses it.
///
/// Each driver call holds the lock for the duration of that call only.
pub type SharedConnection = Arc<Mutex<Box<dyn Connection>>>;

/// The scope repositories live in: one connection and one engine per entity
/// type.
///
/// Engines are built the first time an entity type is used and reused for
/// the rest of the session, including by relation resolution and deferred
/// loads. Cloning a session is cheap and shares the registry.
#[derive(Clone)]
pub struct Session {
    inner: Rc<Inner>,
}

struct Inner {
    connection: SharedConnection,
    engines: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl Session {
    pub fn new(connection: Box<dyn Connection>) -> Session {
        Session::from_shared(Arc::new(Mutex::new(connection)))
    }

    pub fn from_shared(connection: SharedConnection) -> Session {
        Session {
            inner: Rc::new(Inner {
                connection,
                engines: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// A session over the process-wide shared connection.
    pub fn shared() -> Result<Session> {
        Ok(Session::from_shared(connection::shared()?))
    }

    pub fn repository<E: Entity>(&self) -> Result<Repository<E>> {
        Repository::new(self)
    }

    /// Runs parameterless SQL, e.g. DDL, on the session's connection.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        log::debug!(target: "rowbind::sql", "{sql}");
        self.lock()?.execute_batch(sql)
    }

    pub(crate) fn engine<E: Entity>(&self) -> Result<Rc<Engine<E>>> {
        let existing = self.inner.engines.borrow().get(&TypeId::of::<E>()).cloned();

        if let Some(engine) = existing {
            return engine.downcast::<Engine<E>>().map_err(|_| {
                Error::schema_mapping(format!(
                    "engine registry holds a mismatched entry for `{}`",
                    std::any::type_name::<E>()
                ))
            });
        }

        // Built outside the registry borrow
        let engine = Rc::new(Engine::<E>::new(self)?);

        self.inner
            .engines
            .borrow_mut()
            .insert(TypeId::of::<E>(), engine.clone());

        Ok(engine)
    }

    pub(crate) fn exec(&self, op: Operation) -> Result<Response> {
        log::debug!(target: "rowbind::sql", "{}; params={:?}", op.sql(), op.params());
        self.lock()?.exec(op)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Box<dyn Connection>>> {
        self.inner
            .connection
            .lock()
            .map_err(|_| Error::persistence("shared connection lock is poisoned"))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("engines", &self.inner.engines.borrow().len())
            .finish()
    }
}
