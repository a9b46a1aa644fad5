use crate::{schema::ModelBuilder, stmt::Primitive};

use std::{fmt::Debug, hash::Hash};

/// A domain type persisted as one row of one table.
///
/// The identity is stored under the `id` column whatever the implementing
/// type calls the field. It is `None` until the entity has been saved.
///
/// ```ignore
/// #[derive(Debug, Default)]
/// struct Author {
///     id: Option<i64>,
///     user_name: String,
/// }
///
/// impl Entity for Author {
///     type Key = i64;
///
///     fn id(&self) -> Option<&i64> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: Option<i64>) {
///         self.id = id;
///     }
///
///     fn schema(model: &mut ModelBuilder<Self>) {
///         model.field("userName", |a| &a.user_name, |a| &mut a.user_name);
///     }
/// }
/// ```
pub trait Entity: Default + 'static {
    /// Type of the identity value
    type Key: Primitive + Clone + Eq + Hash + Debug;

    fn id(&self) -> Option<&Self::Key>;

    fn set_id(&mut self, id: Option<Self::Key>);

    /// Declares the entity's mapped fields and relations.
    ///
    /// Called once per session when the entity's repository is first
    /// requested; the resulting mapping is immutable afterwards.
    fn schema(model: &mut ModelBuilder<Self>);
}
