//! Column mappings, built once per entity type from [`Entity::schema`].
//!
//! [`Entity::schema`]: crate::Entity::schema

mod column;
pub use column::Column;
pub(crate) use column::Mapped;

mod model;
pub use model::{Model, ModelBuilder};

mod relation;
pub use relation::{FetchStrategy, RelationKind};
pub(crate) use relation::RelationField;

pub use rowbind_core::schema::{accessor_name, snake_case, Table, ID_COLUMN};
