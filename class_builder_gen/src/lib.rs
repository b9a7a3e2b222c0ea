//! Build strongly typed instances from dynamic JSON/YAML documents, driven by
//! a declarative class model.
//!
//! The same per-class builder semantics are available two ways: interpreted
//! at runtime through [`Compiler`], or emitted as Rust source through
//! [`generate_to_writer`]. Both report soft failures to an injected
//! [`Diagnostics`] sink and share the helpers in [`runtime`].

mod builder;
mod codegen;
pub mod diagnostics;
mod error;
mod instance;
mod model;
mod naming;
pub mod runtime;
mod settings;
mod validate;

pub use builder::Compiler;
pub use codegen::generate_classes_to_writer;
pub use diagnostics::{
    CollectedDiagnostics, Diagnostic, DiagnosticKind, Diagnostics, TracingDiagnostics,
};
pub use error::BuilderGenError;
pub use instance::{FieldValue, Instance, Message, OneOf};
pub use model::{ClassCollection, ClassModel, MapValueType, PropertyModel, PropertyType, ScalarKind};
pub use settings::GenerateSettings;
pub use validate::{ModelIssue, ModelIssueKind, validate_model};

use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Generate builder source from a JSON class model and write to `writer`.
///
/// The writer can be any type implementing `Write`, such as `File`, `Vec<u8>`, or
/// `Cursor<Vec<u8>>`, enabling easy unit testing without file system interaction.
///
/// # Errors
///
/// Returns `BuilderGenError` if the model JSON is invalid, the model is empty
/// or (in strict mode) violates an invariant, or writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    model_json: &str,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), BuilderGenError> {
    codegen::generate_to_writer(model_json, writer, settings)
}

/// Generate builder source from a model file and write to an output file.
///
/// # Errors
///
/// Returns `BuilderGenError` if reading the input file fails, the model is
/// rejected, or writing to the output file fails.
pub fn generate_from_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<(), BuilderGenError> {
    let model_json: String = std::fs::read_to_string(input_path)?;
    let mut output: Vec<u8> = Vec::new();
    generate_to_writer(&model_json, &mut output, settings)?;
    std::fs::write(output_path, output)?;
    Ok(())
}

/// Decode a dynamic document from JSON text, or YAML text when `yaml` is set.
///
/// # Errors
///
/// Returns `BuilderGenError::JsonError` or `BuilderGenError::YamlError` when
/// the text does not parse.
pub fn parse_document(text: &str, yaml: bool) -> Result<Value, BuilderGenError> {
    if yaml {
        Ok(serde_yaml::from_str(text)?)
    } else {
        Ok(serde_json::from_str(text)?)
    }
}
