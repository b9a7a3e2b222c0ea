//! Model validation for `deny_invalid_model` mode.
//!
//! Walks the class collection and collects every invariant violation
//! without panicking. Lenient mode never calls this; the builder and the
//! generator tolerate the same constructs on their own.

use crate::error::BuilderGenError;
use crate::model::{ClassCollection, ClassModel, MapValueType, PropertyModel, PropertyType};
use crate::naming;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// What is wrong at a location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelIssueKind {
    #[error("class name is empty")]
    EmptyClassName,
    #[error("class cannot be both a string array and a blob")]
    StringArrayAndBlob,
    #[error("string-array and blob classes cannot declare properties")]
    WrapperWithProperties,
    #[error("oneOf wrapper property must reference a class, found `{0}`")]
    OneOfPropertyNotClass(String),
    #[error("oneOf wrapper cannot require properties")]
    OneOfWithRequired,
    #[error("required property `{0}` is not declared")]
    RequiredNotInProperties(String),
    #[error("unknown property type `{0}`")]
    UnknownPropertyType(String),
    #[error("unknown map value type `{0}`")]
    UnknownMapValueType(String),
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("pattern is only allowed on map properties")]
    PatternOnNonMap,
    #[error("generated field name `{0}` is used by more than one property")]
    FieldNameCollision(String),
    #[error("generated type name `{0}` is used by more than one class")]
    TypeNameCollision(String),
    #[error("generated builder `{0}` is used by more than one class")]
    BuilderNameCollision(String),
    #[error("generated type name `{0}` clashes with a name the generated source uses")]
    ReservedTypeName(String),
}

/// Type names that generated source imports or relies on from the prelude.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "BTreeMap",
    "Box",
    "Diagnostic",
    "Diagnostics",
    "LazyLock",
    "None",
    "Option",
    "Self",
    "Some",
    "String",
    "Value",
    "Vec",
];

/// One problem found in the model. `location` is `Class` or `Class.property`;
/// for name clashes between classes it lists every owner, comma-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIssue {
    pub location: String,
    pub kind: ModelIssueKind,
}

impl fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

fn push_issue(issues: &mut Vec<ModelIssue>, location: String, kind: ModelIssueKind) {
    issues.push(ModelIssue { location, kind });
}

/// Collect all issues in the model. Empty means valid.
#[must_use]
pub fn validate_model(classes: &ClassCollection) -> Vec<ModelIssue> {
    let mut issues: Vec<ModelIssue> = Vec::new();
    for class in classes.iter() {
        collect_class_issues(class, classes, &mut issues);
    }
    issues.extend(name_issues(classes));
    issues
}

/// Clashes between generated item names across the whole model. Any of these
/// makes the generated source fail to compile.
pub(crate) fn name_issues(classes: &ClassCollection) -> Vec<ModelIssue> {
    let mut issues: Vec<ModelIssue> = Vec::new();
    let mut type_owners: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    let mut builder_owners: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for class in classes.iter() {
        let type_name: String = naming::type_name(&class.name);
        if RESERVED_TYPE_NAMES.contains(&type_name.as_str()) {
            push_issue(
                &mut issues,
                class.name.clone(),
                ModelIssueKind::ReservedTypeName(type_name.clone()),
            );
        }
        type_owners.entry(type_name).or_default().push(&class.name);
        if emits_one_of_enum(class, classes) {
            type_owners
                .entry(naming::one_of_enum_name(&class.name))
                .or_default()
                .push(&class.name);
        }
        builder_owners
            .entry(naming::builder_fn_name(&class.name))
            .or_default()
            .push(&class.name);
    }

    for (name, owners) in type_owners {
        if owners.len() > 1 {
            push_issue(&mut issues, owners.join(", "), ModelIssueKind::TypeNameCollision(name));
        }
    }
    for (name, owners) in builder_owners {
        if owners.len() > 1 {
            push_issue(
                &mut issues,
                owners.join(", "),
                ModelIssueKind::BuilderNameCollision(name),
            );
        }
    }
    issues
}

/// A oneOf wrapper gets a `<Class>Oneof` enum when it has a branch.
fn emits_one_of_enum(class: &ClassModel, classes: &ClassCollection) -> bool {
    class.one_of_wrapper
        && class.properties.values().any(|property| {
            !property.repeated && matches!(property.property_type(classes), PropertyType::Class(_))
        })
}

/// Fail with every collected issue when the model is invalid.
///
/// # Errors
///
/// Returns `BuilderGenError::InvalidModel` carrying all issues.
pub fn ensure_valid(classes: &ClassCollection) -> Result<(), BuilderGenError> {
    let issues: Vec<ModelIssue> = validate_model(classes);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(BuilderGenError::InvalidModel(issues))
    }
}

fn collect_class_issues(class: &ClassModel, classes: &ClassCollection, issues: &mut Vec<ModelIssue>) {
    let location: &str = &class.name;

    if class.name.trim().is_empty() {
        push_issue(issues, location.to_string(), ModelIssueKind::EmptyClassName);
    }

    if class.is_string_array && class.is_blob {
        push_issue(issues, location.to_string(), ModelIssueKind::StringArrayAndBlob);
    }
    if (class.is_string_array || class.is_blob) && !class.properties.is_empty() {
        push_issue(issues, location.to_string(), ModelIssueKind::WrapperWithProperties);
    }

    if class.one_of_wrapper && !class.required.is_empty() {
        push_issue(issues, location.to_string(), ModelIssueKind::OneOfWithRequired);
    }

    if !class.open {
        for name in &class.required {
            if !class.properties.contains_key(name) {
                push_issue(
                    issues,
                    location.to_string(),
                    ModelIssueKind::RequiredNotInProperties(name.clone()),
                );
            }
        }
    }

    let mut field_owners: BTreeMap<String, usize> = BTreeMap::new();
    for property in class.properties.values() {
        *field_owners
            .entry(naming::field_name(&property.name))
            .or_insert(0) += 1;
        collect_property_issues(class, property, classes, issues);
    }
    for (field, count) in field_owners {
        if count > 1 {
            push_issue(
                issues,
                location.to_string(),
                ModelIssueKind::FieldNameCollision(field),
            );
        }
    }
}

fn collect_property_issues(
    class: &ClassModel,
    property: &PropertyModel,
    classes: &ClassCollection,
    issues: &mut Vec<ModelIssue>,
) {
    let location: String = format!("{}.{}", class.name, property.name);
    let property_type: PropertyType = property.property_type(classes);

    match &property_type {
        PropertyType::Unknown(type_name) => push_issue(
            issues,
            location.clone(),
            ModelIssueKind::UnknownPropertyType(type_name.clone()),
        ),
        PropertyType::Map(MapValueType::Unknown(type_name)) => push_issue(
            issues,
            location.clone(),
            ModelIssueKind::UnknownMapValueType(type_name.clone()),
        ),
        _ => {}
    }

    if class.one_of_wrapper && !matches!(property_type, PropertyType::Class(_)) {
        push_issue(
            issues,
            location.clone(),
            ModelIssueKind::OneOfPropertyNotClass(property.r#type.clone()),
        );
    }

    if let Some(pattern) = &property.pattern {
        if !matches!(property_type, PropertyType::Map(_)) {
            push_issue(issues, location.clone(), ModelIssueKind::PatternOnNonMap);
        }
        if let Err(e) = regress::Regex::new(pattern) {
            push_issue(
                issues,
                location,
                ModelIssueKind::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                },
            );
        }
    }
}
