/// Declaration values and their rendering into indented lines.
use std::fmt;

use super::writer::LineWriter;
use crate::settings::Indent;

/// The type written after a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub name: String,
    /// Number of array wrappers around `name`
    pub list_depth: usize,
    pub optional: bool,
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            list_depth: 0,
            optional: false,
        }
    }

    pub fn list(mut self) -> Self {
        self.list_depth += 1;
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional |= optional;
        self
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.list_depth {
            f.write_str("[")?;
        }
        f.write_str(&self.name)?;
        for _ in 0..self.list_depth {
            f.write_str("]")?;
        }
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
}

/// A composite type: doc lines, nested declarations, then fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructDecl {
    pub name: String,
    pub doc: Option<String>,
    /// Already-rendered nested declarations
    pub nested: Vec<Vec<String>>,
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn render(&self, indent: Indent) -> Vec<String> {
        let mut w = LineWriter::new(indent);
        if let Some(doc) = &self.doc {
            for line in doc.lines() {
                w.line(format!("/// {line}").trim_end());
            }
        }
        w.open(&format!("struct {}", self.name));
        for block in &self.nested {
            w.block(block);
        }
        for field in &self.fields {
            w.line(&format!("let {}: {}", field.name, field.ty));
        }
        w.close();
        w.finish()
    }
}
