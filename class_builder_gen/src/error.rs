use crate::validate::ModelIssue;
use thiserror::Error;

/// Error type for model loading, compilation, and code generation.
///
/// Conversion of input documents never produces this error: builders report
/// soft failures through [`crate::diagnostics::Diagnostics`] instead.
#[derive(Debug, Error)]
pub enum BuilderGenError {
    /// Generic error with a message.
    #[error("{0}")]
    GenericError(String),

    /// I/O error (e.g., reading a model file, writing generated source).
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing error for input documents.
    #[error(transparent)]
    YamlError(#[from] serde_yaml::Error),

    /// Two classes in the model share a name.
    #[error("duplicate class in model: {0}")]
    DuplicateClass(String),

    /// A build was requested for a class the model does not define.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// Strict validation found problems; all of them are collected here.
    #[error("invalid model: {}", join_issues(.0))]
    InvalidModel(Vec<ModelIssue>),
}

fn join_issues(issues: &[ModelIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}

impl From<&str> for BuilderGenError {
    fn from(message: &str) -> Self {
        Self::GenericError(message.to_string())
    }
}

impl From<String> for BuilderGenError {
    fn from(message: String) -> Self {
        Self::GenericError(message)
    }
}
