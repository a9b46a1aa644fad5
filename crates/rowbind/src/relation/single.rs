use super::Lazy;
use crate::{
    repository::{find_later, Engine, Resolve},
    schema::FetchStrategy,
    stmt::{Conversion, Primitive, Row},
    Entity, Error, Result, Session,
};

use rowbind_core::stmt::Value;

use std::rc::Rc;

/// Storage shared by the single-entity relation containers. The entity is
/// boxed so a type can relate to itself.
///
/// While a deferred load is pending, `key` holds the stored key it will look
/// up, so the owner can be saved again without loading the relation.
pub(super) struct Single<T> {
    value: Lazy<Option<Box<T>>>,
    key: Option<Value>,
}

impl<T> Single<T> {
    pub(super) fn new(value: Option<T>) -> Single<T> {
        Single {
            value: Lazy::loaded(value.map(Box::new)),
            key: None,
        }
    }

    pub(super) fn get(&self) -> Result<Option<&T>> {
        Ok(self.value.get()?.and_then(Option::as_deref))
    }

    pub(super) fn get_mut(&mut self) -> Option<&mut T> {
        self.value.get_mut().and_then(Option::as_deref_mut)
    }

    pub(super) fn set(&mut self, value: Option<T>) {
        self.value.set(value.map(Box::new));
        self.key = None;
    }

    pub(super) fn is_loaded(&self) -> bool {
        self.value.is_loaded()
    }

    pub(super) fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }
}

impl<T: Entity> Single<T> {
    fn deferred(accessor: &str, session: &Session, key: Value) -> Single<T> {
        let find = find_later::<T>(session, key.clone());

        Single {
            value: Lazy::deferred(accessor, move || Ok(find()?.map(Box::new))),
            key: Some(key),
        }
    }

    /// Reads the stored key from the owner's row and materializes the
    /// related entity, or defers the lookup.
    pub(super) fn resolve(
        cx: &Resolve<'_>,
        accessor: &str,
        fetch: FetchStrategy,
        row: &Row,
        column: &str,
    ) -> Result<Single<T>> {
        let raw = row.get(column).cloned().ok_or_else(|| {
            Error::schema_mapping(format!("result set has no column `{column}`"))
        })?;

        let key = match T::Key::TYPE.convert(raw)? {
            Conversion::Value(key) => key,
            Conversion::Unsupported(ty) => {
                return Err(Error::schema_mapping(format!(
                    "identity type `{ty}` of `{}` has no conversion",
                    std::any::type_name::<T>()
                )));
            }
        };

        if key.is_null() {
            return Ok(Single::new(None));
        }

        if fetch.is_lazy() || cx.defers::<T>(&key) {
            return Ok(Single::deferred(accessor, cx.session, key));
        }

        let related = cx
            .session
            .engine::<T>()?
            .find_value(cx.session, cx.path, key)?;

        Ok(Single::new(related))
    }

    /// Persists the related entity with `persist` and returns its key.
    ///
    /// A pending deferred load is not triggered; its stored key is returned
    /// as is.
    pub(super) fn cascade(
        &mut self,
        session: &Session,
        persist: impl FnOnce(&Engine<T>, T) -> Result<Option<T>>,
    ) -> Result<Value> {
        if !self.is_loaded() {
            return Ok(self.key.clone().unwrap_or_default());
        }

        let Some(related) = self.value.take().flatten() else {
            self.set(None);
            return Ok(Value::Null);
        };

        let engine: Rc<Engine<T>> = session.engine()?;
        let persisted = persist(&engine, *related)?;

        let key = persisted
            .as_ref()
            .and_then(Entity::id)
            .cloned()
            .map(Primitive::into_value)
            .unwrap_or_default();

        self.set(persisted);
        Ok(key)
    }
}

impl<T> Default for Single<T> {
    fn default() -> Self {
        Single::new(None)
    }
}

impl<T: Clone> Clone for Single<T> {
    fn clone(&self) -> Self {
        Single {
            value: self.value.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Single<T> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(fmt)
    }
}
