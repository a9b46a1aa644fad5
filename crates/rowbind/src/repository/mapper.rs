use super::{Engine, Path, Resolve};
use crate::{
    schema::{Mapped, ID_COLUMN},
    stmt::{Conversion, Primitive},
    Entity, Error, Result, Session,
};

use rowbind_core::stmt::{Row, Value};

impl<E: Entity> Engine<E> {
    pub(super) fn map_rows(
        &self,
        session: &Session,
        path: &Path,
        rows: Vec<Row>,
    ) -> Result<Vec<E>> {
        rows.iter()
            .map(|row| self.map_row(session, path, row))
            .collect()
    }

    /// Materializes one entity: the identity from the `id` column, then every
    /// mapped column in mapping order.
    pub(super) fn map_row(&self, session: &Session, path: &Path, row: &Row) -> Result<E> {
        let mut entity = E::default();
        let table = self.model.table();

        let raw = row.get(ID_COLUMN).cloned().ok_or_else(|| {
            Error::schema_mapping(format!("result set of `{table}` has no `{ID_COLUMN}` column"))
        })?;

        match E::Key::TYPE.convert(raw)? {
            Conversion::Value(id) => entity.set_id(Option::<E::Key>::load(id)?),
            Conversion::Unsupported(ty) => log::warn!(
                target: "rowbind::mapper",
                "identity type `{ty}` of `{table}` has no conversion; leaving it unset"
            ),
        }

        let owner_id = entity
            .id()
            .cloned()
            .map(Primitive::into_value)
            .unwrap_or(Value::Null);

        let visit = path.enter::<E>(&owner_id);

        let cx = Resolve {
            session,
            path,
            owner_id,
            revisit: visit.is_revisit(),
        };

        for column in self.model.columns() {
            match column.mapped() {
                Mapped::Scalar(field) => {
                    let raw = row.get(column.name()).cloned().ok_or_else(|| {
                        Error::schema_mapping(format!(
                            "result set of `{table}` has no column `{}`",
                            column.name()
                        ))
                    })?;

                    match field.ty().convert(raw)? {
                        Conversion::Value(value) => field.write(&mut entity, value)?,
                        Conversion::Unsupported(ty) => log::warn!(
                            target: "rowbind::mapper",
                            "no conversion for `{ty}`; leaving `{table}.{}` unset",
                            column.name()
                        ),
                    }
                }
                Mapped::Relation(relation) => relation
                    .resolve(&cx, &mut entity, row, column.name())
                    .map_err(|e| {
                        e.context(crate::err!("resolving `{}` of `{table}`", column.field()))
                    })?,
            }
        }

        Ok(entity)
    }
}
