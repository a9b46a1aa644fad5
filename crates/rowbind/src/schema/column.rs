use super::{FetchStrategy, RelationField, RelationKind};
use crate::{
    stmt::{Enumeration, Primitive},
    Result,
};

use rowbind_core::stmt::{Type, Value};

use std::fmt;

/// One entry of an entity's column mapping.
pub struct Column<E> {
    name: String,
    field: String,
    mapped: Mapped<E>,
}

pub(crate) enum Mapped<E> {
    Scalar(Box<dyn ScalarField<E>>),
    Relation(Box<dyn RelationField<E>>),
}

/// Reads and writes one plain field of `E` as a column value.
pub(crate) trait ScalarField<E>: 'static {
    fn ty(&self) -> Type;

    fn read(&self, entity: &E) -> Value;

    /// Stores a value already converted to [`ScalarField::ty`].
    fn write(&self, entity: &mut E, value: Value) -> Result<()>;
}

impl<E: 'static> Column<E> {
    pub(crate) fn new(name: String, field: String, mapped: Mapped<E>) -> Column<E> {
        Column {
            name,
            field,
            mapped,
        }
    }

    /// The column name as it appears in SQL.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field name the column was declared with.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn relation_kind(&self) -> RelationKind {
        match &self.mapped {
            Mapped::Scalar(_) => RelationKind::Simple,
            Mapped::Relation(relation) => relation.kind(),
        }
    }

    /// Fetch strategy of a relation column; always eager for simple columns.
    pub fn fetch(&self) -> FetchStrategy {
        match &self.mapped {
            Mapped::Scalar(_) => FetchStrategy::Eager,
            Mapped::Relation(relation) => relation.fetch(),
        }
    }

    /// Declared type of a simple column, `None` for relations.
    pub fn ty(&self) -> Option<Type> {
        match &self.mapped {
            Mapped::Scalar(field) => Some(field.ty()),
            Mapped::Relation(_) => None,
        }
    }

    pub fn is_stored(&self) -> bool {
        self.relation_kind().is_stored()
    }

    pub(crate) fn mapped(&self) -> &Mapped<E> {
        &self.mapped
    }
}

impl<E: 'static> fmt::Debug for Column<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Column");
        s.field("name", &self.name).field("field", &self.field);

        match &self.mapped {
            Mapped::Scalar(field) => s.field("ty", &field.ty()),
            Mapped::Relation(relation) => s
                .field("kind", &relation.kind())
                .field("fetch", &relation.fetch())
                .field("target", &relation.target()),
        };

        s.finish()
    }
}

pub(crate) struct PrimitiveField<E, T> {
    pub(crate) get: fn(&E) -> &T,
    pub(crate) get_mut: fn(&mut E) -> &mut T,
}

impl<E: 'static, T: Primitive + Clone + 'static> ScalarField<E> for PrimitiveField<E, T> {
    fn ty(&self) -> Type {
        T::TYPE
    }

    fn read(&self, entity: &E) -> Value {
        (self.get)(entity).clone().into_value()
    }

    fn write(&self, entity: &mut E, value: Value) -> Result<()> {
        *(self.get_mut)(entity) = T::load(value)?;
        Ok(())
    }
}

pub(crate) struct EnumField<E, T> {
    pub(crate) get: fn(&E) -> &Option<T>,
    pub(crate) get_mut: fn(&mut E) -> &mut Option<T>,
}

impl<E: 'static, T: Enumeration> ScalarField<E> for EnumField<E, T> {
    fn ty(&self) -> Type {
        Type::Enum
    }

    fn read(&self, entity: &E) -> Value {
        match (self.get)(entity) {
            Some(variant) => Value::I32(variant.ordinal()),
            None => Value::Null,
        }
    }

    fn write(&self, entity: &mut E, value: Value) -> Result<()> {
        let variant = match value {
            Value::Null => None,
            value => T::from_ordinal(i32::try_from(value)?),
        };

        *(self.get_mut)(entity) = variant;
        Ok(())
    }
}
