/// Identifier helpers: definition and property names to type and field names.

const RESERVED: &[&str] = &[
    "associatedtype", "class", "default", "deinit", "enum", "extension", "func", "import",
    "init", "inout", "internal", "let", "operator", "private", "protocol", "public", "repeat",
    "return", "self", "static", "struct", "subscript", "super", "switch", "true", "false",
    "typealias", "var", "where", "while", "nil", "is", "in", "if", "for", "case", "do",
];

/// `pet_owner` -> `PetOwner`
pub fn type_name(raw: &str) -> String {
    let name: String = components(raw).map(upper_first).collect();
    guard_leading_digit(name)
}

/// `first-name` -> `firstName`; reserved words are wrapped in backticks.
pub fn field_name(raw: &str) -> String {
    let joined: String = components(raw).map(upper_first).collect();
    let name = guard_leading_digit(lower_first(&joined));
    if RESERVED.contains(&name.as_str()) {
        format!("`{name}`")
    } else {
        name
    }
}

fn components(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn guard_leading_digit(name: String) -> String {
    match name.chars().next() {
        None => "_".into(),
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        Some(_) => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("owner"), "Owner");
        assert_eq!(type_name("Pet"), "Pet");
        assert_eq!(type_name("pet_owner"), "PetOwner");
        assert_eq!(type_name("api.v1-Response"), "ApiV1Response");
        assert_eq!(type_name("petOwner"), "PetOwner");
    }

    #[test]
    fn test_type_name_edge_cases() {
        assert_eq!(type_name("2fa"), "_2fa");
        assert_eq!(type_name("--"), "_");
    }

    #[test]
    fn test_field_name() {
        assert_eq!(field_name("name"), "name");
        assert_eq!(field_name("first-name"), "firstName");
        assert_eq!(field_name("Owner_ID"), "ownerID");
        assert_eq!(field_name("default"), "`default`");
    }
}
