use crate::{err, Result};

use std::{
    cell::{OnceCell, RefCell},
    fmt,
    rc::Rc,
};

/// A value that is either loaded, or loaded on first access by a deferred
/// loader.
///
/// The loader runs at most once successfully; the loaded value is cached and
/// every later [`Lazy::get`] returns it without running anything. A failed
/// load leaves the loader in place, so the next access retries.
pub struct Lazy<T> {
    value: OnceCell<T>,
    deferred: RefCell<Option<Deferred<T>>>,
}

struct Deferred<T> {
    /// Name the load is reported under, e.g. `getAuthor`
    accessor: String,
    loader: Rc<dyn Fn() -> Result<T>>,
}

impl<T> Lazy<T> {
    pub fn loaded(value: T) -> Lazy<T> {
        Lazy {
            value: OnceCell::from(value),
            deferred: RefCell::new(None),
        }
    }

    pub fn deferred(
        accessor: impl Into<String>,
        loader: impl Fn() -> Result<T> + 'static,
    ) -> Lazy<T> {
        let accessor = accessor.into();
        log::trace!(target: "rowbind::lazy", "registered deferred load; accessor={accessor}");

        Lazy {
            value: OnceCell::new(),
            deferred: RefCell::new(Some(Deferred {
                accessor,
                loader: Rc::new(loader),
            })),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn is_deferred(&self) -> bool {
        !self.is_loaded() && self.deferred.borrow().is_some()
    }

    /// Returns the value, running the deferred loader if it has not run yet.
    ///
    /// Returns `Ok(None)` when the value was never set and there is nothing
    /// to load.
    pub fn get(&self) -> Result<Option<&T>> {
        if let Some(value) = self.value.get() {
            return Ok(Some(value));
        }

        let Some(deferred) = self.deferred.borrow_mut().take() else {
            return Ok(None);
        };

        log::debug!(
            target: "rowbind::lazy",
            "running deferred load; accessor={}",
            deferred.accessor
        );

        match (deferred.loader)() {
            Ok(value) => Ok(Some(self.value.get_or_init(|| value))),
            Err(e) => {
                let e = e.context(err!("deferred load `{}` failed", deferred.accessor));
                *self.deferred.borrow_mut() = Some(deferred);
                Err(e)
            }
        }
    }

    /// Returns the value if it is loaded. Never runs the loader.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.get_mut()
    }

    /// Replaces the contents with a loaded value, discarding any loader.
    pub fn set(&mut self, value: T) {
        self.value = OnceCell::from(value);
        *self.deferred.get_mut() = None;
    }

    /// Takes the loaded value out, leaving the cell empty. A pending loader
    /// is left untouched.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Lazy {
            value: OnceCell::new(),
            deferred: RefCell::new(None),
        }
    }
}

impl<T: Clone> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        let deferred = self.deferred.borrow().as_ref().map(|deferred| Deferred {
            accessor: deferred.accessor.clone(),
            loader: deferred.loader.clone(),
        });

        Lazy {
            value: self.value.clone(),
            deferred: RefCell::new(deferred),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.value.get() {
            return value.fmt(fmt);
        }

        match self.deferred.borrow().as_ref() {
            Some(deferred) => write!(fmt, "<deferred {}>", deferred.accessor),
            None => write!(fmt, "<not loaded>"),
        }
    }
}
