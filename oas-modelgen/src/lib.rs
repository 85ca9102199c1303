//! Model generator for OpenAPI-style `definitions` documents.
//!
//! Decodes a JSON schema document into a typed model ([`ast`]), then walks
//! its definitions ([`generator`]) and emits one declaration per composite
//! type ([`emit_swift`]). References are resolved through [`resolver`].
pub mod ast;
pub mod compiler;
pub mod emit_swift;
pub mod generator;
pub mod resolver;
pub mod settings;

use ast::Document;
use compiler::DecodeError;
use generator::{Generation, ModelGenerator};
use settings::Settings;

/// Decode `bytes` and generate every definition with the in-document resolver.
pub fn generate(bytes: &[u8], settings: &Settings) -> Result<Generation, DecodeError> {
    let document: Document = compiler::decode(bytes, settings.lenient)?;
    Ok(ModelGenerator::new(&document)
        .indent(settings.indent)
        .generate())
}
