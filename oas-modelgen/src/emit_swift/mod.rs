/// Swift-style model emitter: `struct` declarations with `let` fields.
mod decl;
mod names;
mod writer;

pub use decl::{FieldDecl, FieldType, StructDecl};
pub use names::{field_name, type_name};
pub use writer::LineWriter;
