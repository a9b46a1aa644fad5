use super::Engine;
use crate::{Entity, Result, Session};

use rowbind_core::stmt::Value;

use std::{any::TypeId, cell::RefCell, collections::HashSet};

/// Entities currently being materialized, by type and identity.
///
/// Each mapped row enters the path before its relations are resolved and
/// leaves it afterwards. An eager relation pointing back at an entity on the
/// path is deferred instead of fetched, so cyclic eager graphs terminate.
#[derive(Debug, Default)]
pub(crate) struct Path {
    visiting: RefCell<HashSet<(TypeId, Value)>>,
}

/// Leaves the path when dropped.
pub(crate) struct Visit<'a> {
    path: &'a Path,
    entry: Option<(TypeId, Value)>,
    revisit: bool,
}

impl Path {
    /// Enters `(E, id)`. The returned guard reports whether the entity was
    /// already on the path.
    pub(crate) fn enter<E: Entity>(&self, id: &Value) -> Visit<'_> {
        if id.is_null() {
            return Visit {
                path: self,
                entry: None,
                revisit: false,
            };
        }

        let entry = (TypeId::of::<E>(), id.clone());
        let fresh = self.visiting.borrow_mut().insert(entry.clone());

        Visit {
            path: self,
            entry: fresh.then_some(entry),
            revisit: !fresh,
        }
    }

    pub(crate) fn contains<E: Entity>(&self, id: &Value) -> bool {
        self.visiting
            .borrow()
            .contains(&(TypeId::of::<E>(), id.clone()))
    }
}

impl Visit<'_> {
    /// `true` if the entity was already being materialized further up.
    pub(crate) fn is_revisit(&self) -> bool {
        self.revisit
    }
}

impl Drop for Visit<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.entry.take() {
            self.path.visiting.borrow_mut().remove(&entry);
        }
    }
}

/// State handed to relation fields while an owner row is mapped.
pub(crate) struct Resolve<'a> {
    pub(crate) session: &'a Session,
    pub(crate) path: &'a Path,

    /// Identity of the owner being mapped, `Value::Null` if it has none
    pub(crate) owner_id: Value,

    /// The owner was already on the path; none of its relations are fetched
    pub(crate) revisit: bool,
}

impl Resolve<'_> {
    /// Returns `true` if a relation to `(T, key)` must be deferred rather
    /// than fetched.
    pub(crate) fn defers<T: Entity>(&self, key: &Value) -> bool {
        if self.revisit {
            return true;
        }

        let cycle = self.path.contains::<T>(key);

        if cycle {
            log::debug!(
                target: "rowbind::lazy",
                "breaking relation cycle; entity={}, id={key}",
                std::any::type_name::<T>()
            );
        }

        cycle
    }
}

/// A deferred lookup of `T` by identity, starting a fresh path.
pub(crate) fn find_later<T: Entity>(
    session: &Session,
    key: Value,
) -> impl Fn() -> Result<Option<T>> + 'static {
    let session = session.clone();

    move || {
        let engine: std::rc::Rc<Engine<T>> = session.engine()?;
        engine.find_value(&session, &Path::default(), key.clone())
    }
}

/// A deferred lookup of every `T` storing `key` under `column`.
pub(crate) fn find_all_later<T: Entity>(
    session: &Session,
    column: &str,
    key: Value,
) -> impl Fn() -> Result<Vec<T>> + 'static {
    let session = session.clone();
    let column = column.to_string();

    move || {
        let engine: std::rc::Rc<Engine<T>> = session.engine()?;
        engine.query_by_column(&session, &Path::default(), &column, key.clone(), false)
    }
}
