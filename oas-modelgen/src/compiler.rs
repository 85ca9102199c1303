/// Schema decoder: turns a JSON definitions document into the schema value model.
/// Infers the effective type of each node and classifies it into a `Descriptor`.
use crate::ast::{Descriptor, Document, Property, PropertyReference, Reference, SchemaType};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("malformed definition '{name}': {source}")]
    MalformedDefinition {
        name: String,
        #[source]
        source: Box<DecodeError>,
    },
    #[error("{path}: schema node must be a JSON object")]
    NotAnObject { path: String },
    #[error("{path}: '{keyword}' {expected}")]
    InvalidKeyword {
        path: String,
        keyword: &'static str,
        expected: &'static str,
    },
    #[error("{path}: unknown type keyword '{keyword}'")]
    UnknownType { path: String, keyword: String },
    #[error("{path}: unrepresentable type: {reason}")]
    UnrepresentableType { path: String, reason: String },
}

/// Top-level envelope. Definitions stay raw so each one can fail on its own.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    definitions: IndexMap<String, Value>,
}

/// Decode a document from raw JSON bytes.
pub fn decode(bytes: &[u8], lenient: bool) -> Result<Document, DecodeError> {
    let value = parse_json(bytes)?;
    decode_value(&value, lenient)
}

/// Parse raw bytes as JSON; unparseable input is a malformed document.
pub(crate) fn parse_json(bytes: &[u8]) -> Result<Value, DecodeError> {
    serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::MalformedDocument(format!("invalid JSON: {e}")))
}

/// Decode a document from an already-parsed JSON value.
///
/// In lenient mode a definition that fails to decode is left out of the
/// result; otherwise the first failure aborts the whole document.
pub fn decode_value(value: &Value, lenient: bool) -> Result<Document, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::MalformedDocument(
            "document must be a JSON object".into(),
        ));
    }
    let raw = RawDocument::deserialize(value)
        .map_err(|e| DecodeError::MalformedDocument(e.to_string()))?;

    let mut definitions = IndexMap::with_capacity(raw.definitions.len());
    for (name, node) in &raw.definitions {
        let path = format!("/definitions/{}", pointer_segment(name));
        match decode_property(node, &path) {
            Ok(property) => {
                definitions.insert(name.clone(), property);
            }
            Err(error) if lenient => {
                tracing::warn!(definition = %name, %error, "dropping malformed definition");
            }
            Err(error) => {
                return Err(DecodeError::MalformedDefinition {
                    name: name.clone(),
                    source: Box::new(error),
                })
            }
        }
    }

    Ok(Document {
        title: raw.title,
        description: raw.description,
        definitions,
    })
}

/// Decode one schema node. `path` is the JSON pointer used in error messages.
pub fn decode_property(json: &Value, path: &str) -> Result<Property, DecodeError> {
    let obj = json.as_object().ok_or_else(|| DecodeError::NotAnObject {
        path: path.to_string(),
    })?;

    let title = optional_string(obj, "title", path)?;
    let description = optional_string(obj, "description", path)?;
    let (descriptor, nullable) = decode_descriptor(obj, path)?;

    Ok(Property {
        title,
        description,
        nullable,
        descriptor,
    })
}

/// `$ref` objects become `Named`, anything else is decoded inline.
pub fn decode_reference(json: &Value, path: &str) -> Result<PropertyReference, DecodeError> {
    let obj = json.as_object().ok_or_else(|| DecodeError::NotAnObject {
        path: path.to_string(),
    })?;
    match obj.get("$ref") {
        Some(Value::String(reference)) => Ok(Reference::Named(reference.clone())),
        Some(_) => Err(DecodeError::InvalidKeyword {
            path: path.to_string(),
            keyword: "$ref",
            expected: "must be a string",
        }),
        None => Ok(Reference::Resolved(decode_property(json, path)?)),
    }
}

fn decode_descriptor(
    obj: &Map<String, Value>,
    path: &str,
) -> Result<(Descriptor, bool), DecodeError> {
    // anyOf wins over oneOf, both win over `type`
    if let Some(members) = obj.get("anyOf") {
        let members = decode_members(members, "anyOf", path)?;
        return Ok((Descriptor::AnyOf(members), false));
    }
    if let Some(members) = obj.get("oneOf") {
        let members = decode_members(members, "oneOf", path)?;
        return Ok((Descriptor::OneOf(members), false));
    }

    let declared = declared_types(obj, path)?;
    let (schema_type, nullable) = infer_type(&declared, path)?;

    let descriptor = match schema_type {
        SchemaType::Array => {
            let items = obj
                .get("items")
                .ok_or_else(|| DecodeError::UnrepresentableType {
                    path: path.to_string(),
                    reason: "array without 'items'".into(),
                })?;
            let element = decode_reference(items, &format!("{path}/items"))?;
            Descriptor::Array(Box::new(element))
        }
        SchemaType::Object => Descriptor::Object(decode_properties(obj, path)?),
        SchemaType::Boolean => Descriptor::Boolean,
        SchemaType::String => Descriptor::String,
        SchemaType::Integer | SchemaType::Number => Descriptor::Number,
        SchemaType::Null => {
            return Err(DecodeError::UnrepresentableType {
                path: path.to_string(),
                reason: "'null' has no concrete representation".into(),
            })
        }
    };

    Ok((descriptor, nullable))
}

fn decode_members(
    json: &Value,
    keyword: &'static str,
    path: &str,
) -> Result<Vec<PropertyReference>, DecodeError> {
    let arr = json.as_array().ok_or_else(|| DecodeError::InvalidKeyword {
        path: path.to_string(),
        keyword,
        expected: "must be an array of schemas",
    })?;
    arr.iter()
        .enumerate()
        .map(|(i, member)| decode_reference(member, &format!("{path}/{keyword}/{i}")))
        .collect()
}

fn decode_properties(
    obj: &Map<String, Value>,
    path: &str,
) -> Result<IndexMap<String, PropertyReference>, DecodeError> {
    let mut children = IndexMap::new();
    let Some(props) = obj.get("properties") else {
        return Ok(children);
    };
    let props = props.as_object().ok_or_else(|| DecodeError::InvalidKeyword {
        path: path.to_string(),
        keyword: "properties",
        expected: "must be an object",
    })?;
    for (key, schema) in props {
        let child_path = format!("{path}/properties/{}", pointer_segment(key));
        children.insert(key.clone(), decode_reference(schema, &child_path)?);
    }
    Ok(children)
}

/// Reads `type` as a singleton or a list. Absent means `object`.
fn declared_types(obj: &Map<String, Value>, path: &str) -> Result<Vec<SchemaType>, DecodeError> {
    let invalid = || DecodeError::InvalidKeyword {
        path: path.to_string(),
        keyword: "type",
        expected: "must be a string or an array of strings",
    };
    let parse = |s: &str| {
        SchemaType::parse(s).ok_or_else(|| DecodeError::UnknownType {
            path: path.to_string(),
            keyword: s.to_string(),
        })
    };

    match obj.get("type") {
        None => Ok(vec![SchemaType::Object]),
        Some(Value::String(s)) => Ok(vec![parse(s.as_str())?]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(invalid).and_then(parse))
            .collect(),
        Some(_) => Err(invalid()),
    }
}

/// Picks the concrete type out of a declared set. `null` next to a concrete
/// type only marks the node nullable.
pub(crate) fn infer_type(
    declared: &[SchemaType],
    path: &str,
) -> Result<(SchemaType, bool), DecodeError> {
    let nullable = declared.contains(&SchemaType::Null);

    let mut concrete: Vec<SchemaType> = Vec::new();
    for ty in declared {
        let ty = match ty {
            SchemaType::Null => continue,
            SchemaType::Integer => SchemaType::Number,
            other => *other,
        };
        if !concrete.contains(&ty) {
            concrete.push(ty);
        }
    }

    match concrete.as_slice() {
        [] => Err(DecodeError::UnrepresentableType {
            path: path.to_string(),
            reason: "'null' has no concrete representation".into(),
        }),
        [single] => Ok((*single, nullable)),
        many => Err(DecodeError::UnrepresentableType {
            path: path.to_string(),
            reason: format!(
                "multiple concrete types: {}",
                many.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
            ),
        }),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    keyword: &'static str,
    path: &str,
) -> Result<Option<String>, DecodeError> {
    match obj.get(keyword) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::InvalidKeyword {
            path: path.to_string(),
            keyword,
            expected: "must be a string",
        }),
    }
}

/// Escape one JSON pointer segment (RFC 6901).
fn pointer_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
