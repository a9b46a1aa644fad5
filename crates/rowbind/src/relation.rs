//! Relation containers and the fields that resolve and cascade them.

mod belongs_to;
pub use belongs_to::BelongsTo;
pub(crate) use belongs_to::BelongsToField;

mod has_many;
pub use has_many::HasMany;
pub(crate) use has_many::HasManyField;

mod has_one;
pub use has_one::HasOne;
pub(crate) use has_one::HasOneField;

mod lazy;
pub use lazy::Lazy;

mod single;
use single::Single;
