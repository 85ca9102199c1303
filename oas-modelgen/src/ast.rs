/// Schema value model: the decoded, immutable form of a definitions document.
/// Built once by the decoder and only read afterwards.
use indexmap::IndexMap;

/// The primitive `type` keywords a schema node may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Object,
    String,
    Boolean,
    Null,
    Array,
    Integer,
    Number,
}

impl SchemaType {
    pub fn parse(s: &str) -> Option<SchemaType> {
        match s {
            "object" => Some(SchemaType::Object),
            "string" => Some(SchemaType::String),
            "boolean" => Some(SchemaType::Boolean),
            "null" => Some(SchemaType::Null),
            "array" => Some(SchemaType::Array),
            "integer" => Some(SchemaType::Integer),
            "number" => Some(SchemaType::Number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::String => "string",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Array => "array",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
        }
    }
}

/// Either a `$ref` pointer to a named definition or an inline node.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<T> {
    /// `{"$ref": "#/definitions/Owner"}` -- the raw reference string
    Named(String),
    /// Any other node, already decoded
    Resolved(T),
}

impl<T> Reference<T> {
    /// The inline node, if this is not a `$ref`.
    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Reference::Named(_) => None,
            Reference::Resolved(value) => Some(value),
        }
    }
}

pub type PropertyReference = Reference<Property>;

/// The classified shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// `{"anyOf": [...]}` -- untagged union
    AnyOf(Vec<PropertyReference>),
    /// `{"oneOf": [...]}` -- exclusive union, not expanded by the generator
    OneOf(Vec<PropertyReference>),
    /// `{"type": "object", "properties": {...}}`, in document order
    Object(IndexMap<String, PropertyReference>),
    /// `{"type": "array", "items": ...}`
    Array(Box<PropertyReference>),
    String,
    Boolean,
    /// `integer` and `number` both land here
    Number,
}

impl Descriptor {
    /// Built-in type name for scalar leaves.
    pub fn scalar_name(&self) -> Option<&'static str> {
        match self {
            Descriptor::String => Some("String"),
            Descriptor::Boolean => Some("Bool"),
            Descriptor::Number => Some("Double"),
            _ => None,
        }
    }
}

/// One decoded schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `null` was listed next to a concrete type
    pub nullable: bool,
    pub descriptor: Descriptor,
}

/// A decoded definitions document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Definition name -> node, in document order
    pub definitions: IndexMap<String, Property>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_type_round_trips_keywords() {
        for kw in [
            "object", "string", "boolean", "null", "array", "integer", "number",
        ] {
            let parsed = SchemaType::parse(kw).unwrap();
            assert_eq!(parsed.as_str(), kw);
        }
        assert_eq!(SchemaType::parse("timestamp"), None);
    }

    #[test]
    fn test_scalar_names() {
        assert_eq!(Descriptor::String.scalar_name(), Some("String"));
        assert_eq!(Descriptor::Boolean.scalar_name(), Some("Bool"));
        assert_eq!(Descriptor::Number.scalar_name(), Some("Double"));
        assert_eq!(Descriptor::OneOf(vec![]).scalar_name(), None);
        assert_eq!(Descriptor::Object(IndexMap::new()).scalar_name(), None);
    }

    #[test]
    fn test_reference_accessors() {
        let named: PropertyReference = Reference::Named("#/definitions/A".into());
        assert!(named.as_resolved().is_none());

        let inline = Reference::Resolved(Property {
            title: None,
            description: None,
            nullable: false,
            descriptor: Descriptor::String,
        });
        assert_eq!(
            inline.as_resolved().map(|p| &p.descriptor),
            Some(&Descriptor::String)
        );
    }
}
