use super::Single;
use crate::{
    repository::{Path, Resolve},
    schema::{accessor_name, FetchStrategy, RelationField, RelationKind},
    stmt::Row,
    Entity, Result, Session,
};

use rowbind_core::stmt::Value;

use std::fmt;

/// The owner's side of a one-to-one relation.
///
/// The owner's row stores the related entity's key.
pub struct HasOne<T> {
    inner: Single<T>,
}

impl<T> HasOne<T> {
    pub fn new(value: T) -> HasOne<T> {
        HasOne {
            inner: Single::new(Some(value)),
        }
    }

    /// Returns the related entity, loading it first if the relation is lazy.
    pub fn get(&self) -> Result<Option<&T>> {
        self.inner.get()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.inner.get_mut()
    }

    pub fn set(&mut self, value: Option<T>) {
        self.inner.set(value);
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    /// The stored key of a relation that has not been loaded yet.
    pub fn key(&self) -> Option<&Value> {
        self.inner.key()
    }
}

impl<T> From<T> for HasOne<T> {
    fn from(value: T) -> Self {
        HasOne::new(value)
    }
}

impl<T> Default for HasOne<T> {
    fn default() -> Self {
        HasOne {
            inner: Single::default(),
        }
    }
}

impl<T: Clone> Clone for HasOne<T> {
    fn clone(&self) -> Self {
        HasOne {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HasOne<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(fmt)
    }
}

pub(crate) struct HasOneField<E, T> {
    accessor: String,
    fetch: FetchStrategy,
    get_mut: fn(&mut E) -> &mut HasOne<T>,
}

impl<E, T> HasOneField<E, T> {
    pub(crate) fn new(
        field: &str,
        fetch: FetchStrategy,
        get_mut: fn(&mut E) -> &mut HasOne<T>,
    ) -> Self {
        HasOneField {
            accessor: accessor_name(field),
            fetch,
            get_mut,
        }
    }
}

impl<E: Entity, T: Entity> RelationField<E> for HasOneField<E, T> {
    fn kind(&self) -> RelationKind {
        RelationKind::OneToOne
    }

    fn fetch(&self) -> FetchStrategy {
        self.fetch
    }

    fn target(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn resolve(&self, cx: &Resolve<'_>, owner: &mut E, row: &Row, column: &str) -> Result<()> {
        (self.get_mut)(owner).inner = Single::resolve(cx, &self.accessor, self.fetch, row, column)?;
        Ok(())
    }

    /// A related entity that already has an identity is replaced by its
    /// stored copy; one without is saved first.
    fn cascade(&self, session: &Session, owner: &mut E) -> Result<Option<Value>> {
        let key = (self.get_mut)(owner)
            .inner
            .cascade(session, |engine, related| match related.id().cloned() {
                Some(id) => engine.find(session, &Path::default(), &id),
                None => engine.save(session, related),
            })?;

        Ok(Some(key))
    }
}
