pub mod serializer;
pub use serializer::{Serializer, Sql};

pub mod stmt;
pub use stmt::Statement;
