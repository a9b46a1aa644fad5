use super::Lazy;
use crate::{
    repository::{find_all_later, Resolve},
    schema::{accessor_name, FetchStrategy, RelationField, RelationKind},
    stmt::Row,
    Entity, Result, Session,
};

use rowbind_core::stmt::Value;

use std::fmt;

/// The one side of a one-to-many relation. The related entities store the
/// owner's key; nothing is stored on the owner's row.
pub struct HasMany<T> {
    values: Lazy<Vec<T>>,
}

impl<T> HasMany<T> {
    /// Returns the related entities, loading them first if the relation is
    /// lazy.
    pub fn get(&self) -> Result<&[T]> {
        Ok(self.values.get()?.map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn get_mut(&mut self) -> Option<&mut Vec<T>> {
        self.values.get_mut()
    }

    pub fn set(&mut self, values: Vec<T>) {
        self.values.set(values);
    }

    pub fn is_loaded(&self) -> bool {
        self.values.is_loaded()
    }
}

impl<T> From<Vec<T>> for HasMany<T> {
    fn from(values: Vec<T>) -> Self {
        HasMany {
            values: Lazy::loaded(values),
        }
    }
}

impl<T> Default for HasMany<T> {
    fn default() -> Self {
        HasMany::from(vec![])
    }
}

impl<T: Clone> Clone for HasMany<T> {
    fn clone(&self) -> Self {
        HasMany {
            values: self.values.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HasMany<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.values.fmt(fmt)
    }
}

pub(crate) struct HasManyField<E, T> {
    accessor: String,
    fetch: FetchStrategy,
    get_mut: fn(&mut E) -> &mut HasMany<T>,
}

impl<E, T> HasManyField<E, T> {
    pub(crate) fn new(
        field: &str,
        fetch: FetchStrategy,
        get_mut: fn(&mut E) -> &mut HasMany<T>,
    ) -> Self {
        HasManyField {
            accessor: accessor_name(field),
            fetch,
            get_mut,
        }
    }
}

impl<E: Entity, T: Entity> RelationField<E> for HasManyField<E, T> {
    fn kind(&self) -> RelationKind {
        RelationKind::OneToMany
    }

    fn fetch(&self) -> FetchStrategy {
        self.fetch
    }

    fn target(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    /// `column` belongs to the related table; the owner's row is not read.
    fn resolve(&self, cx: &Resolve<'_>, owner: &mut E, _row: &Row, column: &str) -> Result<()> {
        let slot = (self.get_mut)(owner);

        if cx.owner_id.is_null() {
            *slot = HasMany::default();
            return Ok(());
        }

        slot.values = if self.fetch.is_lazy() || cx.revisit {
            Lazy::deferred(
                &*self.accessor,
                find_all_later::<T>(cx.session, column, cx.owner_id.clone()),
            )
        } else {
            let related = cx.session.engine::<T>()?.query_by_column(
                cx.session,
                cx.path,
                column,
                cx.owner_id.clone(),
                false,
            )?;

            Lazy::loaded(related)
        };

        Ok(())
    }

    /// Each element is updated if it exists in storage and saved otherwise.
    /// The collection is replaced with the persisted elements. An unloaded
    /// collection is left alone.
    fn cascade(&self, session: &Session, owner: &mut E) -> Result<Option<Value>> {
        let slot = (self.get_mut)(owner);

        let Some(elements) = slot.values.take() else {
            log::trace!(target: "rowbind::cascade", "skipping unloaded `{}`", self.accessor);
            return Ok(None);
        };

        let engine = session.engine::<T>()?;
        let mut persisted = Vec::with_capacity(elements.len());

        for element in elements {
            match engine.save_or_update(session, element)? {
                Some(element) => persisted.push(element),
                None => log::warn!(
                    target: "rowbind::cascade",
                    "`{}` element of `{}` was not persisted; dropping it from the collection",
                    self.accessor,
                    std::any::type_name::<E>()
                ),
            }
        }

        slot.set(persisted);
        Ok(None)
    }
}
