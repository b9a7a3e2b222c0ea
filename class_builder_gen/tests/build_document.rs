use class_builder_gen::{
    ClassCollection, CollectedDiagnostics, Compiler, DiagnosticKind, GenerateSettings, Instance,
    parse_document,
};
use serde_json::json;
use std::fs;

const MODEL_JSON: &str = r#"{
    "classes": [
        {
            "name": "Document",
            "required": ["swagger"],
            "properties": {
                "swagger": { "type": "string" },
                "schemes": { "type": "string", "repeated": true },
                "info": { "type": "Info" },
                "paths": { "type": "Paths" }
            }
        },
        {
            "name": "Paths",
            "open": true,
            "properties": {
                "path": { "type": "map<string, PathItem>", "pattern": "^/" }
            }
        },
        {
            "name": "Info",
            "required": ["title"],
            "properties": {
                "title": { "type": "string" },
                "version": { "type": "string" }
            }
        },
        {
            "name": "PathItem",
            "open": true,
            "properties": {
                "summary": { "type": "string" }
            }
        }
    ]
}"#;

#[test]
fn build_yaml_document_from_model_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let model_path = dir.path().join("model.json");
    fs::write(&model_path, MODEL_JSON).expect("write model");
    let model_json: String = fs::read_to_string(&model_path).expect("read model");

    let classes = ClassCollection::from_json(&model_json).expect("valid model");
    let settings = GenerateSettings {
        deny_invalid_model: true,
        ..GenerateSettings::default()
    };
    let compiler = Compiler::new(&classes, &settings).expect("valid model compiles");

    let yaml: &str = "
swagger: '2.0'
schemes: [https]
info:
  title: Pets
  version: 1
paths:
  /pets:
    summary: list pets
";
    let document = parse_document(yaml, true).expect("valid YAML");
    let mut sink = CollectedDiagnostics::new();
    let instance: Instance = compiler
        .build("Document", &document, &mut sink)
        .expect("known class")
        .expect("document builds");

    let actual = serde_json::to_value(&instance).expect("serializable");
    let expected = json!({
        "class": "Document",
        "fields": {
            "info": { "class": "Info", "fields": { "title": "Pets" } },
            "paths": {
                "class": "Paths",
                "fields": {
                    "path": {
                        "/pets": { "class": "PathItem", "fields": { "summary": "list pets" } }
                    }
                }
            },
            "schemes": ["https"],
            "swagger": "2.0"
        }
    });
    assert_eq!(expected, actual);

    // `version: 1` is an integer, not a string.
    let reported: Vec<_> = sink.into_vec();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].path, "/info/version");
    assert!(matches!(
        reported[0].kind,
        DiagnosticKind::ScalarTypeMismatch { expected: "string", .. }
    ));
}

#[test]
fn build_rejects_document_missing_required_key() {
    let classes = ClassCollection::from_json(MODEL_JSON).expect("valid model");
    let compiler = Compiler::new(&classes, &GenerateSettings::default()).expect("compiles");
    let mut sink = CollectedDiagnostics::new();
    let actual = compiler
        .build("Document", &json!({"info": {"title": "x"}}), &mut sink)
        .expect("known class");
    assert_eq!(actual, None);
    assert!(sink.is_empty());
}
