//! Build an `Info` instance from a YAML document with the model shown in the
//! README, printing the result and any soft failures.
//!
//! Run with `cargo run --example build_info`.

use class_builder_gen::{
    BuilderGenError, ClassCollection, CollectedDiagnostics, Compiler, GenerateSettings, Instance,
    parse_document,
};

const MODEL_JSON: &str = r#"{
  "classes": [
    {
      "name": "Info",
      "required": ["title"],
      "properties": {
        "title": { "type": "string" },
        "tags": { "type": "string", "repeated": true }
      }
    }
  ]
}"#;

const DOCUMENT_YAML: &str = "title: Pet Store\ntags:\n  - pets\n  - 7\n";

fn main() -> Result<(), BuilderGenError> {
    let classes = ClassCollection::from_json(MODEL_JSON)?;
    let settings = GenerateSettings {
        deny_invalid_model: true,
        ..GenerateSettings::default()
    };
    let compiler = Compiler::new(&classes, &settings)?;

    let document = parse_document(DOCUMENT_YAML, true)?;
    let mut diagnostics = CollectedDiagnostics::new();
    let instance: Option<Instance> = compiler.build("Info", &document, &mut diagnostics)?;

    println!("{}", serde_json::to_string_pretty(&instance)?);
    for diagnostic in diagnostics.iter() {
        println!("{diagnostic}");
    }
    Ok(())
}
