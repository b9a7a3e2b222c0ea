//! Soft-failure reporting for builders.
//!
//! Builders never log to a global stream on their own. Every conversion call
//! receives a [`Diagnostics`] sink; [`TracingDiagnostics`] forwards to
//! `tracing`, [`CollectedDiagnostics`] keeps records for inspection.

use serde_json::Value;
use std::fmt;

use crate::runtime::value_kind;

/// Kind of soft failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A map-backed class received something other than an object.
    NotAMapping { found: &'static str },
    /// A string-array class received something other than a string.
    NotAString { found: &'static str },
    /// A repeated property received something other than an array.
    NotASequence {
        property: String,
        found: &'static str,
    },
    /// A scalar value did not have its declared primitive type.
    ScalarTypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAMapping { found } => write!(f, "expected an object, found {found}"),
            Self::NotAString { found } => write!(f, "expected a string, found {found}"),
            Self::NotASequence { property, found } => {
                write!(f, "expected an array for `{property}`, found {found}")
            }
            Self::ScalarTypeMismatch {
                property,
                expected,
                found,
            } => write!(f, "expected {expected} for `{property}`, found {found}"),
        }
    }
}

/// One soft failure. `path` is a JSON Pointer (RFC 6901) to the offending
/// value inside the document passed to the top-level build call.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub class_name: String,
    pub path: String,
    pub kind: DiagnosticKind,
    pub value: Value,
}

impl Diagnostic {
    #[must_use]
    pub fn not_a_mapping(class_name: &str, path: &str, value: &Value) -> Self {
        Self::new(
            class_name,
            path,
            DiagnosticKind::NotAMapping {
                found: value_kind(value),
            },
            value,
        )
    }

    #[must_use]
    pub fn not_a_string(class_name: &str, path: &str, value: &Value) -> Self {
        Self::new(
            class_name,
            path,
            DiagnosticKind::NotAString {
                found: value_kind(value),
            },
            value,
        )
    }

    #[must_use]
    pub fn not_a_sequence(class_name: &str, property: &str, path: &str, value: &Value) -> Self {
        Self::new(
            class_name,
            path,
            DiagnosticKind::NotASequence {
                property: property.to_string(),
                found: value_kind(value),
            },
            value,
        )
    }

    #[must_use]
    pub fn scalar_mismatch(
        class_name: &str,
        property: &str,
        path: &str,
        expected: &'static str,
        value: &Value,
    ) -> Self {
        Self::new(
            class_name,
            path,
            DiagnosticKind::ScalarTypeMismatch {
                property: property.to_string(),
                expected,
                found: value_kind(value),
            },
            value,
        )
    }

    fn new(class_name: &str, path: &str, kind: DiagnosticKind, value: &Value) -> Self {
        Self {
            class_name: class_name.to_string(),
            path: path.to_string(),
            kind,
            value: value.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: &str = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "build{} at {path}: {}", self.class_name, self.kind)
    }
}

/// Receives soft failures from builders.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            class = %diagnostic.class_name,
            path = %diagnostic.path,
            value = %diagnostic.value,
            "unexpected input: {}",
            diagnostic.kind
        );
    }
}

/// Keeps every diagnostic in arrival order.
#[derive(Debug, Clone, Default)]
pub struct CollectedDiagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl CollectedDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
