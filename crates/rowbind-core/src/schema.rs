mod name;
pub use name::{accessor_name, snake_case};

mod table;
pub use table::Table;

/// Column name every entity's identity is stored under, whatever the
/// identity field itself is called.
pub const ID_COLUMN: &str = "id";
