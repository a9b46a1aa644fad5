pub mod connection;

mod entity;
pub use entity::Entity;

pub mod relation;
pub use relation::{BelongsTo, HasMany, HasOne, Lazy};

mod repository;
pub use repository::Repository;

pub mod schema;
pub use schema::{FetchStrategy, ModelBuilder, RelationKind};

mod session;
pub use session::{Session, SharedConnection};

pub mod stmt;
pub use stmt::{Enumeration, Primitive};

pub use rowbind_core::{bail, err, Error, Result};

#[cfg(feature = "sqlite")]
pub use rowbind_driver_sqlite as sqlite;

pub mod driver {
    pub use rowbind_core::driver::*;
}
