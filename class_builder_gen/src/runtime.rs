//! Helpers called by builders, both the interpreter in [`crate::builder`]
//! and the functions emitted by [`crate::generate_to_writer`].
//!
//! Generated code reaches these as `class_builder_gen::runtime::*`, so their
//! signatures are part of the generated-code contract.

use crate::diagnostics::{Diagnostic, Diagnostics};
use serde_json::Value;

/// String-keyed mapping of dynamic values.
pub type Map = serde_json::Map<String, Value>;

/// Downcast to a string-keyed mapping.
#[must_use]
pub fn unpack_map(value: &Value) -> Option<&Map> {
    value.as_object()
}

#[must_use]
pub fn map_has_key(m: &Map, key: &str) -> bool {
    m.contains_key(key)
}

/// True iff every key in `keys` is present in `m`.
#[must_use]
pub fn map_contains_all_keys<K: AsRef<str>>(m: &Map, keys: &[K]) -> bool {
    keys.iter().all(|key| m.contains_key(key.as_ref()))
}

/// True iff every key of `m` is a member of `allowed`.
#[must_use]
pub fn map_contains_only_keys<K: AsRef<str>>(m: &Map, allowed: &[K]) -> bool {
    m.keys()
        .all(|key| allowed.iter().any(|candidate| candidate.as_ref() == key))
}

/// Key pattern of a map property, compiled once. Generated builders hold
/// one per pattern in a `LazyLock` static.
#[derive(Debug)]
pub struct KeyPattern {
    /// `None` when the pattern did not compile; no key is admitted.
    regex: Option<regress::Regex>,
}

impl KeyPattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            regex: regress::Regex::new(pattern).ok(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Unanchored search of `key`.
    #[must_use]
    pub fn admits(&self, key: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.find(key).is_some())
    }
}

/// Unanchored regular-expression search. An invalid pattern matches nothing.
/// Compiles `pattern` on every call; prefer [`KeyPattern`] in loops.
#[must_use]
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    KeyPattern::new(pattern).admits(key)
}

/// Best-effort element-wise downcast; non-string elements are dropped.
#[must_use]
pub fn convert_array_to_string_array(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Textual rendering stored by blob classes: strings verbatim,
/// everything else as compact JSON.
#[must_use]
pub fn render_blob(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Short name of a value's dynamic type, used in diagnostics.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Append one segment to a JSON Pointer, escaping `~` as `~0` and `/` as `~1`.
#[must_use]
pub fn child_path(path: &str, segment: &str) -> String {
    let escaped: String = segment.replace('~', "~0").replace('/', "~1");
    format!("{path}/{escaped}")
}

/// A primitive that a scalar property can hold. Conversion is exact:
/// there is no coercion between numeric kinds.
pub trait Scalar: Sized {
    /// Name used in mismatch diagnostics.
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl Scalar for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Scalar for i64 {
    const EXPECTED: &'static str = "int64";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl Scalar for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_f64() { value.as_f64() } else { None }
    }
}

impl Scalar for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

/// Convert a scalar property value, reporting a mismatch instead of failing.
pub fn scalar<T: Scalar>(
    value: &Value,
    class_name: &str,
    property: &str,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<T> {
    let converted: Option<T> = T::from_value(value);
    if converted.is_none() {
        diagnostics.report(Diagnostic::scalar_mismatch(
            class_name,
            property,
            path,
            T::EXPECTED,
            value,
        ));
    }
    converted
}

/// Borrow a repeated property's elements, reporting a non-array value.
pub fn sequence<'v>(
    value: &'v Value,
    class_name: &str,
    property: &str,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<&'v [Value]> {
    if let Value::Array(items) = value {
        Some(items)
    } else {
        diagnostics.report(Diagnostic::not_a_sequence(class_name, property, path, value));
        None
    }
}

/// Convert a repeated scalar property. Mismatched elements are reported
/// and dropped; the rest keep their order.
pub fn scalar_sequence<T: Scalar>(
    value: &Value,
    class_name: &str,
    property: &str,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Vec<T>> {
    let items: &[Value] = sequence(value, class_name, property, path, diagnostics)?;
    let converted: Vec<T> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let item_path: String = child_path(path, &index.to_string());
            scalar::<T>(item, class_name, property, &item_path, diagnostics)
        })
        .collect();
    Some(converted)
}
