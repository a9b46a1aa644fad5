mod primitive;
pub use primitive::{Enumeration, Primitive};

mod primitive_chrono;

pub use rowbind_core::stmt::{Conversion, Row, Type, Value};
