/// Reference resolution: maps a `$ref` string to a decoded definition.
/// Resolvers are stateless; deduplication is the generator's job.
use std::borrow::Cow;

use indexmap::IndexMap;

use crate::ast::{Document, Property};
use crate::compiler::{decode_property, parse_json, DecodeError};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("reference '{0}' not found in definitions")]
    MissingReference(String),
    #[error("reference '{reference}' does not decode: {source}")]
    DecodeFailure {
        reference: String,
        #[source]
        source: DecodeError,
    },
}

/// A resolved reference: the definition name it points at and its node.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub name: String,
    pub property: Cow<'a, Property>,
}

/// Looks up the node a reference string points at.
pub trait ReferenceResolver {
    fn resolve(&self, reference: &str) -> Result<Resolved<'_>, ResolveError>;
}

/// Definition name for a reference string.
///
/// `#/definitions/Owner` and `Owner` both name `Owner`; pointer escapes are
/// decoded. Anything else is returned untouched.
pub fn definition_name(reference: &str) -> Cow<'_, str> {
    let Some(name) = reference.strip_prefix(DEFINITIONS_PREFIX) else {
        return Cow::Borrowed(reference);
    };
    if name.contains('~') {
        Cow::Owned(name.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Resolves references against the definitions of one document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentResolver<'a> {
    definitions: &'a IndexMap<String, Property>,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            definitions: &document.definitions,
        }
    }
}

impl ReferenceResolver for DocumentResolver<'_> {
    fn resolve(&self, reference: &str) -> Result<Resolved<'_>, ResolveError> {
        let name = definition_name(reference);
        let (name, property) = self
            .definitions
            .get_key_value(name.as_ref())
            .ok_or_else(|| ResolveError::MissingReference(reference.to_string()))?;
        Ok(Resolved {
            name: name.clone(),
            property: Cow::Borrowed(property),
        })
    }
}

/// Resolves references through an injected provider of raw JSON bytes.
/// The bytes must hold a single schema node.
pub struct ProviderResolver<F> {
    provider: F,
}

impl<F> ProviderResolver<F>
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    pub fn new(provider: F) -> Self {
        Self { provider }
    }
}

impl<F> ReferenceResolver for ProviderResolver<F>
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn resolve(&self, reference: &str) -> Result<Resolved<'_>, ResolveError> {
        let bytes = (self.provider)(reference)
            .ok_or_else(|| ResolveError::MissingReference(reference.to_string()))?;
        let failure = |source: DecodeError| ResolveError::DecodeFailure {
            reference: reference.to_string(),
            source,
        };
        let value = parse_json(&bytes).map_err(failure)?;
        let property = decode_property(&value, reference).map_err(failure)?;
        Ok(Resolved {
            name: definition_name(reference).into_owned(),
            property: Cow::Owned(property),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Descriptor;
    use crate::compiler::decode_value;
    use serde_json::json;

    #[test]
    fn test_definition_name() {
        assert_eq!(definition_name("#/definitions/Owner"), "Owner");
        assert_eq!(definition_name("Owner"), "Owner");
        assert_eq!(definition_name("#/definitions/a~1b~0c"), "a/b~c");
        assert_eq!(
            definition_name("other.json#/definitions/Owner"),
            "other.json#/definitions/Owner"
        );
    }

    #[test]
    fn test_document_resolver() {
        let doc = decode_value(
            &json!({"definitions": {"Owner": {"type": "string"}}}),
            false,
        )
        .unwrap();
        let resolver = DocumentResolver::new(&doc);

        let resolved = resolver.resolve("#/definitions/Owner").unwrap();
        assert_eq!(resolved.name, "Owner");
        assert_eq!(resolved.property.descriptor, Descriptor::String);
        assert!(matches!(resolved.property, Cow::Borrowed(_)));

        assert!(resolver.resolve("Owner").is_ok());
    }

    #[test]
    fn test_document_resolver_missing() {
        let doc = Document::default();
        let err = DocumentResolver::new(&doc)
            .resolve("#/definitions/Ghost")
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingReference(r) if r == "#/definitions/Ghost"));
    }

    #[test]
    fn test_provider_resolver() {
        let resolver = ProviderResolver::new(|reference: &str| match reference {
            "#/definitions/Tag" => Some(br#"{"type": "string"}"#.to_vec()),
            "#/definitions/Broken" => Some(br#"{"type": "null"}"#.to_vec()),
            "#/definitions/Garbage" => Some(b"{".to_vec()),
            _ => None,
        });

        let resolved = resolver.resolve("#/definitions/Tag").unwrap();
        assert_eq!(resolved.name, "Tag");
        assert_eq!(resolved.property.descriptor, Descriptor::String);

        assert!(matches!(
            resolver.resolve("#/definitions/Broken"),
            Err(ResolveError::DecodeFailure { .. })
        ));
        assert!(matches!(
            resolver.resolve("#/definitions/Garbage"),
            Err(ResolveError::DecodeFailure {
                source: DecodeError::MalformedDocument(_),
                ..
            })
        ));
        assert!(matches!(
            resolver.resolve("#/definitions/Nope"),
            Err(ResolveError::MissingReference(_))
        ));
    }
}
