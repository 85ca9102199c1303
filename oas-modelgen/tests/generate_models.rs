/// End-to-end: JSON bytes in, rendered declarations out.
use oas_modelgen::compiler::{self, DecodeError};
use oas_modelgen::generator::ModelGenerator;
use oas_modelgen::settings::Settings;
use pretty_assertions::assert_eq;
use serde_json::json;

const PETSTORE: &[u8] = include_bytes!("fixtures/petstore.json");

fn render(schema: serde_json::Value) -> String {
    let bytes = serde_json::to_vec(&schema).unwrap();
    let generation = oas_modelgen::generate(&bytes, &Settings::default()).unwrap();
    assert!(generation.is_complete(), "{:?}", generation.failures);
    generation.render()
}

#[test]
fn test_pet_and_owner() {
    let code = render(json!({"definitions": {
        "Pet": {"type": "object", "properties": {
            "name": {"type": "string"},
            "owner": {"$ref": "#/definitions/Owner"}
        }},
        "Owner": {"type": "object", "properties": {"id": {"type": "number"}}}
    }}));
    assert_eq!(
        code,
        "struct Pet {\n\tlet name: String\n\tlet owner: Owner\n}\nstruct Owner {\n\tlet id: Double\n}"
    );
    assert_eq!(code.matches("struct Owner {").count(), 1);
}

#[test]
fn test_array_property_adds_no_declaration() {
    let code = render(json!({"definitions": {
        "Owner": {"properties": {"id": {"type": "number"}}},
        "Kennel": {"properties": {
            "owners": {"type": "array", "items": {"$ref": "#/definitions/Owner"}}
        }}
    }}));
    assert_eq!(
        code,
        "struct Owner {\n\tlet id: Double\n}\nstruct Kennel {\n\tlet owners: [Owner]\n}"
    );
}

#[test]
fn test_petstore_fixture() {
    let generation = oas_modelgen::generate(PETSTORE, &Settings::default()).unwrap();
    assert!(generation.is_complete());

    let names: Vec<&str> = generation.context.declarations().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["Category", "Tag", "Pet", "Order", "Card", "Cash"]);

    let expected = "\
struct Category {
\tlet id: Double
\tlet name: String
}
struct Tag {
\tlet id: Double
\tlet name: String?
}
/// A pet for sale.
struct Pet {
\tstruct Dimensions {
\t\tlet height: Double
\t\tlet width: Double
\t}
\tlet id: Double
\tlet category: Category
\tlet name: String
\tlet photoUrls: [String]
\tlet tags: [Tag]
\tlet status: String
\tlet dimensions: Dimensions
\tlet parent: Pet
}
struct Order {
\tlet id: Double
\tlet pet: Pet
\tlet complete: Bool
\tlet payment: Card
}
struct Card {
\tlet number: String
}
struct Cash {
\tlet currency: String
}";
    assert_eq!(generation.render(), expected);
}

#[test]
fn test_strict_and_lenient_decoding() {
    let schema = json!({"definitions": {
        "Good": {"properties": {"id": {"type": "number"}}},
        "Bad": {"type": "array"}
    }});
    let bytes = serde_json::to_vec(&schema).unwrap();

    let err = oas_modelgen::generate(&bytes, &Settings::default()).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedDefinition { ref name, .. } if name == "Bad"));

    let document = compiler::decode(&bytes, true).unwrap();
    assert_eq!(document.definitions.len(), 1);
    assert!(document.definitions.contains_key("Good"));

    let generation = oas_modelgen::generate(&bytes, &Settings::default().lenient(true)).unwrap();
    assert_eq!(generation.render(), "struct Good {\n\tlet id: Double\n}");
}

#[test]
fn test_reference_to_dropped_definition_is_missing() {
    let schema = json!({"definitions": {
        "Holder": {"properties": {"bad": {"$ref": "#/definitions/Bad"}}},
        "Bad": {"type": "null"}
    }});
    let document = compiler::decode_value(&schema, true).unwrap();
    let generation = ModelGenerator::new(&document).generate();

    assert_eq!(generation.failures.len(), 1);
    assert_eq!(generation.failures[0].definition(), "Holder");
    assert!(generation.failures[0].to_string().contains("#/definitions/Bad"));
    assert!(generation.context.is_empty());
}
