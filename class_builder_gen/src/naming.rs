//! Identifier and type mapping for emitted Rust source.

use crate::model::{ClassCollection, MapValueType, PropertyModel, PropertyType, ScalarKind};
use heck::ToSnakeCase;

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Convert a class name to a Rust type identifier (`PascalCase`).
/// Splits on any non-alphanumeric character and uppercases the first letter
/// of each part, keeping the rest as written so `OpenAPI` stays `OpenAPI`.
/// Examples: `"TypeItem"` -> `"TypeItem"`, `"path-item"` -> `"PathItem"`
#[must_use]
pub fn type_name(class_name: &str) -> String {
    let joined: String = class_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect();
    if joined.is_empty() || joined.starts_with(|c: char| c.is_ascii_digit()) {
        format!("C{joined}")
    } else {
        joined
    }
}

/// Name of the union enum for a oneOf wrapper class.
#[must_use]
pub fn one_of_enum_name(class_name: &str) -> String {
    format!("{}Oneof", type_name(class_name))
}

/// Name of the generated builder function for a class.
#[must_use]
pub fn builder_fn_name(class_name: &str) -> String {
    format!("build_{}", class_name.to_snake_case())
}

/// Snake-case form of a property name. A leading `$` survives as `_`,
/// so `$ref` becomes `_ref` instead of colliding with `ref`.
#[must_use]
pub fn snake_name(property_name: &str) -> String {
    let (prefix, rest): (&str, &str) = match property_name.strip_prefix('$') {
        Some(rest) => ("_", rest),
        None => ("", property_name),
    };
    let snake: String = rest.to_snake_case();
    if snake.is_empty() {
        return format!("{prefix}field");
    }
    if prefix.is_empty() && snake.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{snake}");
    }
    format!("{prefix}{snake}")
}

/// Rust field identifier for a property. Keywords get a trailing `_`.
#[must_use]
pub fn field_name(property_name: &str) -> String {
    let snake: String = snake_name(property_name);
    if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("{snake}_")
    } else {
        snake
    }
}

/// Type as written in the descriptive field comment; `int` reads `int64`.
#[must_use]
pub fn proto_type(type_name: &str) -> &str {
    if type_name == "int" { "int64" } else { type_name }
}

/// One-line description of a property in protobuf field syntax,
/// e.g. `repeated string tags = 3;`.
#[must_use]
pub fn field_comment(property: &PropertyModel, field_number: usize) -> String {
    let repeated: &str = if property.repeated { "repeated " } else { "" };
    format!(
        "{repeated}{} {} = {field_number};",
        proto_type(&property.r#type),
        snake_name(&property.name)
    )
}

/// Path to a generated type, qualified by `types_module` when set.
#[must_use]
pub fn qualified(types_module: Option<&str>, ident: &str) -> String {
    match types_module {
        Some(module) => format!("{module}::{ident}"),
        None => ident.to_string(),
    }
}

/// Rust type of a scalar kind.
#[must_use]
pub fn scalar_rust_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "String",
        ScalarKind::Int => "i64",
        ScalarKind::Float => "f64",
        ScalarKind::Bool => "bool",
    }
}

/// Rust type of the struct field backing `property`, or `None` when the
/// property's type does not resolve and no field is emitted.
#[must_use]
pub fn rust_field_type(property: &PropertyModel, classes: &ClassCollection) -> Option<String> {
    let rust_type: String = match property.property_type(classes) {
        PropertyType::Scalar(kind) if property.repeated => {
            format!("Vec<{}>", scalar_rust_type(kind))
        }
        PropertyType::Scalar(kind) => scalar_rust_type(kind).to_string(),
        PropertyType::Class(class_name) if property.repeated => {
            format!("Vec<{}>", type_name(&class_name))
        }
        PropertyType::Class(class_name) => format!("Option<Box<{}>>", type_name(&class_name)),
        PropertyType::Map(MapValueType::String) => "BTreeMap<String, String>".to_string(),
        PropertyType::Map(MapValueType::Class(class_name)) => {
            format!("BTreeMap<String, {}>", type_name(&class_name))
        }
        PropertyType::Map(MapValueType::Unknown(_)) | PropertyType::Unknown(_) => return None,
    };
    Some(rust_type)
}
