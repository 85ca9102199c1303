/// Model generation: walks the definitions of a document and produces one
/// declaration per composite type reachable from them.
///
/// The walk threads a single `GenerationContext` through every step. A type
/// name is entered into the context before any recursion on it, so reference
/// cycles and shared definitions are visited exactly once.
use indexmap::{IndexMap, IndexSet};

use crate::ast::{Descriptor, Document, Property, PropertyReference, Reference};
use crate::emit_swift::{field_name, type_name, FieldDecl, FieldType, StructDecl};
use crate::resolver::{DocumentResolver, ReferenceResolver, ResolveError};
use crate::settings::Indent;

/// A top-level definition that could not be generated.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("definition '{definition}': {source}")]
    Unresolved {
        definition: String,
        #[source]
        source: ResolveError,
    },
    #[error("definition '{definition}': type name '{type_name}' is already taken by '{existing}'")]
    NameCollision {
        definition: String,
        type_name: String,
        existing: String,
    },
}

impl GenerateError {
    pub fn definition(&self) -> &str {
        match self {
            GenerateError::Unresolved { definition, .. }
            | GenerateError::NameCollision { definition, .. } => definition,
        }
    }
}

/// Emitted so far: type name -> declaration lines, in first-emission order.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Every type name generation has started on, declared or not
    entered: IndexSet<String>,
    declarations: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    entered: usize,
    declarations: usize,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once generation has started on `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entered.contains(type_name)
    }

    pub fn declaration(&self, type_name: &str) -> Option<&[String]> {
        self.declarations.get(type_name).map(Vec::as_slice)
    }

    pub fn declarations(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.declarations
            .iter()
            .map(|(name, lines)| (name.as_str(), lines.as_slice()))
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declaration lines, flattened in first-emission order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.declarations
            .values()
            .flat_map(|lines| lines.iter().map(String::as_str))
    }

    fn enter(&mut self, type_name: &str) -> bool {
        self.entered.insert(type_name.to_string())
    }

    fn declare(&mut self, type_name: &str, lines: Vec<String>) {
        // re-declaring keeps the original position
        self.declarations.insert(type_name.to_string(), lines);
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            entered: self.entered.len(),
            declarations: self.declarations.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.entered.truncate(checkpoint.entered);
        self.declarations.truncate(checkpoint.declarations);
    }
}

/// Reported once per top-level definition after it has been processed.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// `ceil(processed / total * 100)`, 1..=100
    pub percent: u8,
    pub definition: &'a str,
    pub property: &'a Property,
}

/// Result of a full run over a document.
#[derive(Debug, Default)]
pub struct Generation {
    pub context: GenerationContext,
    pub failures: Vec<GenerateError>,
}

impl Generation {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Newline-joined declarations.
    pub fn render(&self) -> String {
        self.context.lines().collect::<Vec<_>>().join("\n")
    }
}

/// Where an inline object met while naming a field gets declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inline {
    /// Under a property: rendered inside the parent declaration
    Nested,
    /// Element of a definition's array: declared under the definition's name
    Element,
    /// Member of a definition's anyOf: not declared at all
    Undeclared,
}

pub struct ModelGenerator<'a, R = DocumentResolver<'a>> {
    document: &'a Document,
    resolver: R,
    indent: Indent,
}

impl<'a> ModelGenerator<'a> {
    /// Generator resolving references against the document's own definitions.
    pub fn new(document: &'a Document) -> Self {
        Self::with_resolver(document, DocumentResolver::new(document))
    }
}

impl<'a, R: ReferenceResolver> ModelGenerator<'a, R> {
    pub fn with_resolver(document: &'a Document, resolver: R) -> Self {
        Self {
            document,
            resolver,
            indent: Indent::default(),
        }
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn generate(&self) -> Generation {
        self.generate_with_progress(|_| {})
    }

    /// Generate every top-level definition, sharing one context across them.
    ///
    /// A definition that fails is rolled back out of the context and recorded
    /// in `Generation::failures`; the remaining definitions still run. Of two
    /// definitions sharing a type name, the first in document order wins.
    pub fn generate_with_progress(&self, mut observer: impl FnMut(Progress<'_>)) -> Generation {
        let total = self.document.definitions.len();
        let mut context = GenerationContext::new();
        let mut failures = Vec::new();

        let mut owners: IndexMap<String, &str> = IndexMap::new();
        for name in self.document.definitions.keys() {
            owners.entry(type_name(name)).or_insert(name.as_str());
        }

        for (index, (name, property)) in self.document.definitions.iter().enumerate() {
            let type_name = type_name(name);
            match owners.get(&type_name).copied() {
                Some(existing) if existing != name.as_str() => {
                    tracing::warn!(
                        definition = %name,
                        %type_name,
                        existing,
                        "type name already taken, skipping definition"
                    );
                    failures.push(GenerateError::NameCollision {
                        definition: name.clone(),
                        type_name,
                        existing: existing.to_string(),
                    });
                }
                _ => {
                    let checkpoint = context.checkpoint();
                    if let Err(source) = self.generate_type(&type_name, property, &mut context) {
                        tracing::error!(definition = %name, error = %source, "failed to generate definition");
                        context.rollback(checkpoint);
                        failures.push(GenerateError::Unresolved {
                            definition: name.clone(),
                            source,
                        });
                    }
                }
            }
            observer(Progress {
                percent: percent(index + 1, total),
                definition: name,
                property,
            });
        }

        Generation { context, failures }
    }

    /// Generate `property` under `type_name` and everything it references.
    /// Does nothing if `type_name` was already entered.
    pub fn generate_type(
        &self,
        type_name: &str,
        property: &Property,
        context: &mut GenerationContext,
    ) -> Result<(), ResolveError> {
        if !context.enter(type_name) {
            return Ok(());
        }
        tracing::debug!(type_name, "generating type");

        match &property.descriptor {
            Descriptor::Object(children) => {
                self.generate_object(type_name, property, children, context)
            }
            Descriptor::Array(element) => self.generate_member(element, type_name, context),
            // dispatch only: members are never declared under the anyOf's name
            Descriptor::AnyOf(members) => members
                .iter()
                .try_for_each(|member| self.walk_child(member, context)),
            Descriptor::OneOf(_) => {
                tracing::debug!(type_name, "oneOf is not expanded");
                Ok(())
            }
            Descriptor::String | Descriptor::Boolean | Descriptor::Number => Ok(()),
        }
    }

    fn generate_object(
        &self,
        type_name: &str,
        property: &Property,
        children: &IndexMap<String, PropertyReference>,
        context: &mut GenerationContext,
    ) -> Result<(), ResolveError> {
        // placeholder so references back to this type stop here
        context.declare(type_name, Vec::new());
        for child in children.values() {
            self.walk_child(child, context)?;
        }
        let decl = self.struct_decl(type_name, property, children)?;
        context.declare(type_name, decl.render(self.indent));
        Ok(())
    }

    /// Element of a top-level array. An inline object element takes the
    /// array's name.
    fn generate_member(
        &self,
        reference: &PropertyReference,
        parent: &str,
        context: &mut GenerationContext,
    ) -> Result<(), ResolveError> {
        let property = match reference {
            Reference::Named(reference) => {
                let resolved = self.resolver.resolve(reference)?;
                return self.generate_type(&type_name(&resolved.name), &resolved.property, context);
            }
            Reference::Resolved(property) => property,
        };
        match &property.descriptor {
            Descriptor::Object(children) if context.declaration(parent).is_none() => {
                self.generate_object(parent, property, children, context)
            }
            Descriptor::Array(element) => self.generate_member(element, parent, context),
            Descriptor::AnyOf(members) => members
                .iter()
                .try_for_each(|member| self.walk_child(member, context)),
            _ => Ok(()),
        }
    }

    /// Generate the named types reachable from a property without leaving
    /// its declaration. Inline objects are rendered nested, so only their
    /// references need visiting.
    fn walk_child(
        &self,
        reference: &PropertyReference,
        context: &mut GenerationContext,
    ) -> Result<(), ResolveError> {
        let property = match reference {
            Reference::Named(reference) => {
                let resolved = self.resolver.resolve(reference)?;
                return self.generate_type(&type_name(&resolved.name), &resolved.property, context);
            }
            Reference::Resolved(property) => property,
        };
        match &property.descriptor {
            Descriptor::Object(children) => children
                .values()
                .try_for_each(|child| self.walk_child(child, context)),
            Descriptor::Array(element) => self.walk_child(element, context),
            Descriptor::AnyOf(members) => members
                .iter()
                .try_for_each(|member| self.walk_child(member, context)),
            _ => Ok(()),
        }
    }

    fn struct_decl(
        &self,
        name: &str,
        property: &Property,
        children: &IndexMap<String, PropertyReference>,
    ) -> Result<StructDecl, ResolveError> {
        let mut decl = StructDecl::new(name);
        decl.doc = property.description.clone();

        for (key, child) in children {
            let child_type = type_name(key);
            let Some(ty) = self.field_type(child, &child_type, &mut Vec::new(), Inline::Nested)? else {
                tracing::debug!(type_name = name, field = %key, "no representable field type, skipping");
                continue;
            };
            if let Some(nested) = self.nested_declaration(child, &child_type)? {
                decl.nested.push(nested);
            }
            decl.fields.push(FieldDecl {
                name: field_name(key),
                ty,
            });
        }
        Ok(decl)
    }

    /// Type of a field reached through `reference`. `parent` names inline
    /// objects; `seen` stops naming cycles through arrays and anyOf.
    fn field_type(
        &self,
        reference: &PropertyReference,
        parent: &str,
        seen: &mut Vec<String>,
        inline: Inline,
    ) -> Result<Option<FieldType>, ResolveError> {
        match reference {
            Reference::Named(reference) => {
                let resolved = self.resolver.resolve(reference)?;
                if seen.contains(&resolved.name) {
                    return Ok(None);
                }
                seen.push(resolved.name.clone());
                self.describe(&resolved.property, &type_name(&resolved.name), seen, Inline::Element)
            }
            Reference::Resolved(property) => self.describe(property, parent, seen, inline),
        }
    }

    fn describe(
        &self,
        property: &Property,
        name: &str,
        seen: &mut Vec<String>,
        inline: Inline,
    ) -> Result<Option<FieldType>, ResolveError> {
        let ty = match &property.descriptor {
            Descriptor::Object(_) if inline == Inline::Undeclared => None,
            Descriptor::Object(_) => Some(FieldType::named(name)),
            Descriptor::Array(element) => self
                .field_type(element, name, seen, inline)?
                .map(FieldType::list),
            Descriptor::AnyOf(members) => {
                let inline = match inline {
                    Inline::Nested => Inline::Nested,
                    Inline::Element | Inline::Undeclared => Inline::Undeclared,
                };
                self.first_usable(members, name, seen, inline)?.map(|(_, ty)| ty)
            }
            Descriptor::OneOf(_) => None,
            scalar => scalar.scalar_name().map(FieldType::named),
        };
        Ok(ty.map(|ty| ty.optional(property.nullable)))
    }

    /// First anyOf member that yields a field type, with its index.
    fn first_usable(
        &self,
        members: &[PropertyReference],
        name: &str,
        seen: &mut Vec<String>,
        inline: Inline,
    ) -> Result<Option<(usize, FieldType)>, ResolveError> {
        for (index, member) in members.iter().enumerate() {
            if let Some(ty) = self.field_type(member, name, seen, inline)? {
                return Ok(Some((index, ty)));
            }
        }
        Ok(None)
    }

    /// Rendered declaration of the inline object a field carries, if any.
    fn nested_declaration(
        &self,
        reference: &PropertyReference,
        name: &str,
    ) -> Result<Option<Vec<String>>, ResolveError> {
        let Some(property) = reference.as_resolved() else {
            return Ok(None);
        };
        match &property.descriptor {
            Descriptor::Object(children) => {
                let decl = self.struct_decl(name, property, children)?;
                Ok(Some(decl.render(self.indent)))
            }
            Descriptor::Array(element) => self.nested_declaration(element, name),
            Descriptor::AnyOf(members) => {
                match self.first_usable(members, name, &mut Vec::new(), Inline::Nested)? {
                    Some((index, _)) => self.nested_declaration(&members[index], name),
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }
}

fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed * 100).div_ceil(total)).min(100) as u8
}
