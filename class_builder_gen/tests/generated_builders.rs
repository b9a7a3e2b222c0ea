//! Checked-in generator output for `tests/generated/model.json`, compiled and
//! exercised against the same inputs as the interpreter.

#[path = "generated/builders.rs"]
mod builders;

use builders::{
    Any, Document, Info, PathItem, Schema, SchemaOneof, Tag, TypeItem, build_document,
    build_paths, build_schema, build_type_item,
};
use class_builder_gen::{
    ClassCollection, CollectedDiagnostics, Compiler, Diagnostic, DiagnosticKind,
    GenerateSettings, generate_to_writer,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;

const MODEL_JSON: &str = include_str!("generated/model.json");
const GENERATED_SOURCE: &str = include_str!("generated/builders.rs");

fn strict() -> GenerateSettings {
    GenerateSettings {
        deny_invalid_model: true,
        ..GenerateSettings::default()
    }
}

fn document(value: &Value) -> (Option<Document>, Vec<Diagnostic>) {
    let mut sink = CollectedDiagnostics::new();
    let built: Option<Document> = build_document(value, "", &mut sink);
    (built, sink.into_vec())
}

#[test]
fn checked_in_source_matches_generator() {
    let mut output: Vec<u8> = Vec::new();
    generate_to_writer(MODEL_JSON, &mut output, &strict()).expect("strict model generates");
    let actual: String = String::from_utf8(output).expect("UTF-8");
    assert_eq!(GENERATED_SOURCE, actual);
}

#[test]
fn builds_every_property_kind() {
    let input: Value = json!({
        "swagger": "2.0",
        "info": {"title": "Pets", "version": "1", "draft": true, "ratio": 0.5},
        "ports": [80, 443],
        "schemes": ["http", "https"],
        "tags": [{"name": "pets"}],
        "schema": {"$ref": "#/definitions/Pet"},
        "paths": {"/pets": {"summary": "List pets"}},
        "x-logo": {"url": "logo.png"},
        "x-owner": "team"
    });
    let (built, diagnostics) = document(&input);
    let built: Document = built.expect("document builds");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    assert_eq!(built.swagger, "2.0");
    assert_eq!(built.ports, vec![80, 443]);
    assert_eq!(built.schemes, vec!["http".to_string(), "https".to_string()]);
    assert_eq!(
        built.tags.iter().map(|t| t.name.as_str()).collect::<Vec<&str>>(),
        vec!["pets"]
    );

    let info: &Info = built.info.as_deref().expect("info");
    assert_eq!(info.title, "Pets");
    assert_eq!(info.version, "1");
    assert!(info.draft);
    assert!((info.ratio - 0.5).abs() < f64::EPSILON);

    let schema: &Schema = built.schema.as_deref().expect("schema");
    match &schema.oneof {
        Some(SchemaOneof::JsonReference(reference)) => {
            assert_eq!(reference._ref, "#/definitions/Pet");
        }
        other => panic!("expected a reference, got {other:?}"),
    }

    let paths = built.paths.as_deref().expect("paths");
    let pets: &PathItem = paths.path.get("/pets").expect("/pets");
    assert_eq!(pets.summary, "List pets");
    assert!(pets.extension.is_empty());

    let expected: BTreeMap<String, Any> = BTreeMap::from([
        (
            "x-logo".to_string(),
            Any {
                value: r#"{"url":"logo.png"}"#.to_string(),
            },
        ),
        (
            "x-owner".to_string(),
            Any {
                value: "team".to_string(),
            },
        ),
    ]);
    assert_eq!(expected, built.vendor_extension);
}

#[test]
fn closed_class_rejects_extra_key_silently() {
    let input: Value = json!({"swagger": "2.0", "info": {"title": "Pets", "license": "MIT"}});
    let (built, diagnostics) = document(&input);
    let built: Document = built.expect("document builds");
    assert_eq!(None, built.info);
    assert!(diagnostics.is_empty());
}

#[test]
fn missing_required_key_fails_silently() {
    let (built, diagnostics) = document(&json!({"info": {"title": "Pets"}}));
    assert_eq!(None, built);
    assert!(diagnostics.is_empty());
}

#[test]
fn non_mapping_document_is_reported() {
    let (built, diagnostics) = document(&json!(["2.0"]));
    assert_eq!(None, built);
    let kinds: Vec<&DiagnosticKind> = diagnostics.iter().map(|d| &d.kind).collect();
    assert_eq!(vec![&DiagnosticKind::NotAMapping { found: "array" }], kinds);
}

#[test]
fn building_twice_gives_equal_results() {
    let input: Value = json!({
        "swagger": "2.0",
        "info": {"title": 7},
        "tags": [{"name": "a"}, 3],
        "x-a": [1, 2]
    });
    let first = document(&input);
    let second = document(&input);
    assert_eq!(first, second);
}

#[test]
fn one_of_picks_first_matching_branch() {
    let mut sink = CollectedDiagnostics::new();

    let inline: Schema =
        build_schema(&json!({"type": "string"}), "", &mut sink).expect("schema builds");
    let expected_type = TypeItem {
        value: vec!["string".to_string()],
    };
    match inline.oneof {
        Some(SchemaOneof::Inline(branch)) => {
            assert_eq!(Some(&expected_type), branch.type_.as_deref());
        }
        other => panic!("expected an inline schema, got {other:?}"),
    }

    let both: Schema = build_schema(&json!({"type": "string", "$ref": "#/a"}), "", &mut sink)
        .expect("schema builds");
    assert!(matches!(both.oneof, Some(SchemaOneof::Inline(_))));

    let neither: Schema =
        build_schema(&json!({"description": "x"}), "", &mut sink).expect("schema builds");
    assert_eq!(None, neither.oneof);
    assert!(sink.is_empty());
}

#[test]
fn failed_repeated_element_keeps_its_slot() {
    let input: Value = json!({
        "swagger": "2.0",
        "tags": [{"name": "a"}, {"name": "b", "extra": 1}, {"name": "c"}]
    });
    let (built, _) = document(&input);
    let expected: Vec<Tag> = vec![
        Tag {
            name: "a".to_string(),
        },
        Tag::default(),
        Tag {
            name: "c".to_string(),
        },
    ];
    assert_eq!(expected, built.expect("document builds").tags);
}

#[test]
fn string_array_wraps_string_and_reports_other_values() {
    let mut sink = CollectedDiagnostics::new();
    let expected = TypeItem {
        value: vec!["hello".to_string()],
    };
    assert_eq!(Some(expected), build_type_item(&json!("hello"), "", &mut sink));
    assert!(sink.is_empty());

    assert_eq!(None, build_type_item(&json!(42), "/type", &mut sink));
    let reported: Vec<Diagnostic> = sink.into_vec();
    assert_eq!(1, reported.len());
    assert_eq!("/type", reported[0].path);
    assert_eq!(DiagnosticKind::NotAString { found: "integer" }, reported[0].kind);
}

#[test]
fn pattern_maps_keep_only_matching_keys() {
    let mut sink = CollectedDiagnostics::new();
    let input: Value = json!({
        "/pets": {"summary": "s", "x-rate": "10", "other": 1},
        "pets": {"summary": "skipped"}
    });
    let paths = build_paths(&input, "", &mut sink).expect("paths build");
    assert_eq!(vec!["/pets"], paths.path.keys().map(String::as_str).collect::<Vec<&str>>());

    let item: &PathItem = &paths.path["/pets"];
    let expected: BTreeMap<String, String> =
        BTreeMap::from([("x-rate".to_string(), "10".to_string())]);
    assert_eq!(expected, item.extension);
    assert!(sink.is_empty());
}

#[test]
fn scalar_mismatch_is_soft() {
    let input: Value = json!({"swagger": "2.0", "info": {"title": 42, "ratio": 1}});
    let (built, diagnostics) = document(&input);
    let info: Info = *built.expect("document builds").info.expect("info builds");
    assert_eq!(Info::default(), info);

    let reported: Vec<(&str, &DiagnosticKind)> = diagnostics
        .iter()
        .map(|d| (d.path.as_str(), &d.kind))
        .collect();
    let expected_ratio = DiagnosticKind::ScalarTypeMismatch {
        property: "ratio".to_string(),
        expected: "float",
        found: "integer",
    };
    let expected_title = DiagnosticKind::ScalarTypeMismatch {
        property: "title".to_string(),
        expected: "string",
        found: "integer",
    };
    assert_eq!(
        vec![("/info/ratio", &expected_ratio), ("/info/title", &expected_title)],
        reported
    );
}

#[test]
fn generated_and_interpreted_builders_agree() {
    let classes = ClassCollection::from_json(MODEL_JSON).expect("valid model");
    let compiler = Compiler::new(&classes, &strict()).expect("strict model compiles");
    let inputs: Vec<Value> = vec![
        json!({"swagger": "2.0"}),
        json!({"info": {"title": "x"}}),
        json!("2.0"),
        json!({"swagger": 2, "ports": [1, "two"], "schemes": "http"}),
        json!({"swagger": "2.0", "tags": [{"name": 1}, [], {"name": "b"}]}),
        json!({"swagger": "2.0", "schema": {"type": 42}, "x-n": null}),
        json!({"swagger": "2.0", "paths": {"/a": {"x-b": true}, "/c": 5}}),
    ];
    for input in &inputs {
        let mut interpreted_sink = CollectedDiagnostics::new();
        let interpreted = compiler
            .build("Document", input, &mut interpreted_sink)
            .expect("known class");
        let (generated, generated_diagnostics) = document(input);
        assert_eq!(interpreted.is_some(), generated.is_some(), "{input}");
        assert_eq!(interpreted_sink.into_vec(), generated_diagnostics, "{input}");
    }
}
