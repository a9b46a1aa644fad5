use super::Single;
use crate::{
    repository::{Path, Resolve},
    schema::{accessor_name, FetchStrategy, RelationField, RelationKind},
    stmt::Row,
    Entity, Result, Session,
};

use rowbind_core::stmt::Value;

use std::fmt;

/// The many side of a many-to-one relation: the owner's row stores the key
/// of an entity other owners may point at too.
pub struct BelongsTo<T> {
    inner: Single<T>,
}

impl<T> BelongsTo<T> {
    pub fn new(value: T) -> BelongsTo<T> {
        BelongsTo {
            inner: Single::new(Some(value)),
        }
    }

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

    pub fn key(&self) -> Option<&Value> {
        self.inner.key()
    }
}

impl<T> From<T> for BelongsTo<T> {
    fn from(value: T) -> Self {
        BelongsTo::new(value)
    }
}

impl<T> Default for BelongsTo<T> {
    fn default() -> Self {
        BelongsTo {
            inner: Single::default(),
        }
    }
}

impl<T: Clone> Clone for BelongsTo<T> {
    fn clone(&self) -> Self {
        BelongsTo {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BelongsTo<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(fmt)
    }
}

pub(crate) struct BelongsToField<E, T> {
    accessor: String,
    fetch: FetchStrategy,
    get_mut: fn(&mut E) -> &mut BelongsTo<T>,
}

impl<E, T> BelongsToField<E, T> {
    pub(crate) fn new(
        field: &str,
        fetch: FetchStrategy,
        get_mut: fn(&mut E) -> &mut BelongsTo<T>,
    ) -> Self {
        BelongsToField {
            accessor: accessor_name(field),
            fetch,
            get_mut,
        }
    }
}

impl<E: Entity, T: Entity> RelationField<E> for BelongsToField<E, T> {
    fn kind(&self) -> RelationKind {
        RelationKind::ManyToOne
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

    fn cascade(&self, session: &Session, owner: &mut E) -> Result<Option<Value>> {
        let key = (self.get_mut)(owner).inner.cascade(session, |engine, related| {
            match related.id().cloned() {
                Some(id) if engine.exists(session, Some(&id)) => {
                    engine.find(session, &Path::default(), &id)
                }
                _ => engine.save(session, related),
            }
        })?;

        Ok(Some(key))
    }
}
