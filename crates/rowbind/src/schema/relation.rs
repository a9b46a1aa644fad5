use crate::{repository::Resolve, stmt::Row, Result, Session};

use rowbind_core::stmt::Value;

/// How a mapped column relates to other entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// A plain value column
    Simple,

    /// The column stores the key of exactly one related entity, which is not
    /// shared with other owners
    OneToOne,

    /// The column stores the key of a related entity that may be shared by
    /// many owners
    ManyToOne,

    /// The related entities store the owner's key under the column; nothing
    /// is stored on the owner's row
    OneToMany,
}

impl RelationKind {
    /// Returns `true` if the column contributes a bound parameter to insert
    /// and update statements.
    pub fn is_stored(self) -> bool {
        !matches!(self, RelationKind::OneToMany)
    }
}

/// When a relation is materialized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStrategy {
    /// While the owner's row is mapped
    #[default]
    Eager,

    /// On first access to the relation
    Lazy,
}

impl FetchStrategy {
    pub fn is_lazy(self) -> bool {
        matches!(self, FetchStrategy::Lazy)
    }
}

/// A relation field on entity `E`.
pub(crate) trait RelationField<E>: 'static {
    fn kind(&self) -> RelationKind;

    fn fetch(&self) -> FetchStrategy;

    /// Name of the related entity type, for diagnostics.
    fn target(&self) -> &'static str;

    /// Materializes the relation on a freshly mapped owner.
    fn resolve(&self, cx: &Resolve<'_>, owner: &mut E, row: &Row, column: &str) -> Result<()>;

    /// Persists the related entities ahead of the owner's row and writes the
    /// persisted instances back into the owner.
    ///
    /// Returns the key to bind under the relation column, or `None` for a
    /// relation that stores nothing on the owner's row.
    fn cascade(&self, session: &Session, owner: &mut E) -> Result<Option<Value>>;
}
