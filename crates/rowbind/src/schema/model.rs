use super::{
    column::{EnumField, PrimitiveField},
    snake_case, Column, FetchStrategy, Mapped, Table, ID_COLUMN,
};
use crate::{
    relation::{BelongsTo, BelongsToField, HasMany, HasManyField, HasOne, HasOneField},
    stmt::{Enumeration, Primitive},
    Entity, Error, Result,
};

use indexmap::IndexMap;

use std::fmt;

/// The mapping of an entity type: its table and its ordered columns.
///
/// Column order is declaration order. Insert and update statements bind the
/// stored columns in this order.
pub struct Model<E> {
    table: Table,
    columns: IndexMap<String, Column<E>>,
    scalar_count: usize,
}

impl<E: Entity> Model<E> {
    /// Builds the mapping declared by [`Entity::schema`].
    pub fn build() -> Result<Model<E>> {
        let mut builder = ModelBuilder::new();
        E::schema(&mut builder);
        builder.finish()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Get a column by its SQL name
    pub fn column(&self, name: &str) -> Option<&Column<E>> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &Column<E>> + '_ {
        self.columns.values()
    }

    /// Names of the columns bound by insert and update, in bind order.
    pub fn stored_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns()
            .filter(|column| column.is_stored())
            .map(Column::name)
    }

    /// Number of parameters an insert binds; an update binds one more.
    pub fn scalar_count(&self) -> usize {
        self.scalar_count
    }
}

impl<E: 'static> fmt::Debug for Model<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("table", &self.table)
            .field("columns", &self.columns)
            .field("scalar_count", &self.scalar_count)
            .finish()
    }
}

/// Collects the column declarations of an entity type.
pub struct ModelBuilder<E> {
    schema: Option<String>,
    columns: Vec<Column<E>>,
}

impl<E: Entity> ModelBuilder<E> {
    fn new() -> ModelBuilder<E> {
        ModelBuilder {
            schema: None,
            columns: vec![],
        }
    }

    /// Places the table in a database schema: `<schema>.<table>`.
    pub fn schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    /// Maps a plain field. The column name is the snake-case form of `name`.
    pub fn field<T>(
        &mut self,
        name: &str,
        get: fn(&E) -> &T,
        get_mut: fn(&mut E) -> &mut T,
    ) -> &mut Self
    where
        T: Primitive + Clone + 'static,
    {
        let mapped = Mapped::Scalar(Box::new(PrimitiveField { get, get_mut }));
        self.push(snake_case(name), name, mapped)
    }

    /// Maps an enumeration field, stored as the variant ordinal.
    pub fn enumeration<T>(
        &mut self,
        name: &str,
        get: fn(&E) -> &Option<T>,
        get_mut: fn(&mut E) -> &mut Option<T>,
    ) -> &mut Self
    where
        T: Enumeration,
    {
        let mapped = Mapped::Scalar(Box::new(EnumField { get, get_mut }));
        self.push(snake_case(name), name, mapped)
    }

    /// Maps a one-to-one relation whose key is stored in `column`.
    pub fn one_to_one<T: Entity>(
        &mut self,
        field: &str,
        column: &str,
        fetch: FetchStrategy,
        get_mut: fn(&mut E) -> &mut HasOne<T>,
    ) -> &mut Self {
        let mapped = Mapped::Relation(Box::new(HasOneField::new(field, fetch, get_mut)));
        self.push(column.to_string(), field, mapped)
    }

    /// Maps a many-to-one relation whose key is stored in `column`.
    pub fn many_to_one<T: Entity>(
        &mut self,
        field: &str,
        column: &str,
        fetch: FetchStrategy,
        get_mut: fn(&mut E) -> &mut BelongsTo<T>,
    ) -> &mut Self {
        let mapped = Mapped::Relation(Box::new(BelongsToField::new(field, fetch, get_mut)));
        self.push(column.to_string(), field, mapped)
    }

    /// Maps a one-to-many relation. `column` names the column of `T`'s table
    /// that holds the owner's key.
    pub fn one_to_many<T: Entity>(
        &mut self,
        field: &str,
        column: &str,
        fetch: FetchStrategy,
        get_mut: fn(&mut E) -> &mut HasMany<T>,
    ) -> &mut Self {
        let mapped = Mapped::Relation(Box::new(HasManyField::new(field, fetch, get_mut)));
        self.push(column.to_string(), field, mapped)
    }

    fn push(&mut self, column: String, field: &str, mapped: Mapped<E>) -> &mut Self {
        self.columns
            .push(Column::new(column, field.to_string(), mapped));
        self
    }

    fn finish(self) -> Result<Model<E>> {
        let table = Table::for_type(std::any::type_name::<E>(), self.schema.as_deref());

        if table.name.is_empty() {
            return Err(Error::schema_mapping(format!(
                "cannot derive a table name for `{}`",
                std::any::type_name::<E>()
            )));
        }

        let mut columns = IndexMap::with_capacity(self.columns.len());
        let mut scalar_count = 0;

        for column in self.columns {
            if column.name().is_empty() {
                return Err(Error::schema_mapping(format!(
                    "field `{}` on `{table}` maps to an empty column name",
                    column.field()
                )));
            }

            if column.name().eq_ignore_ascii_case(ID_COLUMN) {
                return Err(Error::schema_mapping(format!(
                    "field `{}` on `{table}` maps to `{ID_COLUMN}`, which is reserved for the identity",
                    column.field()
                )));
            }

            if columns.contains_key(column.name()) {
                return Err(Error::schema_mapping(format!(
                    "column `{}` is mapped twice on `{table}`",
                    column.name()
                )));
            }

            if column.is_stored() {
                scalar_count += 1;
            }

            columns.insert(column.name().to_string(), column);
        }

        Ok(Model {
            table,
            columns,
            scalar_count,
        })
    }
}
