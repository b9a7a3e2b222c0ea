//! In-memory schema model: classes, their properties, and property types.
//!
//! The model is loaded once and treated as immutable afterwards. Properties
//! and classes are kept in `BTreeMap`s so every walk over the model is
//! lexicographic and the generated output is deterministic.

use crate::error::BuilderGenError;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// One schema class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassModel {
    pub name: String,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertyModel>,

    #[serde(default)]
    pub required: BTreeSet<String>,

    /// Unrecognized input keys are tolerated when true.
    #[serde(default)]
    pub open: bool,

    /// Discriminated union: the first nested class that builds wins.
    #[serde(default)]
    pub one_of_wrapper: bool,

    /// Wraps a bare string as a one-element sequence.
    #[serde(default)]
    pub is_string_array: bool,

    /// Stores an opaque rendering of any value.
    #[serde(default)]
    pub is_blob: bool,
}

impl ClassModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyModel) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    #[must_use]
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    #[must_use]
    pub fn one_of(mut self) -> Self {
        self.one_of_wrapper = true;
        self
    }

    #[must_use]
    pub fn string_array(mut self) -> Self {
        self.is_string_array = true;
        self
    }

    #[must_use]
    pub fn blob(mut self) -> Self {
        self.is_blob = true;
        self
    }
}

/// One property within a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PropertyModel {
    /// Key expected in the input mapping. Filled from the map key on load.
    #[serde(default)]
    pub name: String,

    pub r#type: String,

    #[serde(default)]
    pub repeated: bool,

    /// Only meaningful on map-typed properties.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl PropertyModel {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: type_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Resolve the declared type string against the classes of `classes`.
    #[must_use]
    pub fn property_type(&self, classes: &ClassCollection) -> PropertyType {
        PropertyType::resolve(&self.r#type, classes)
    }
}

/// Primitive property kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
}

impl ScalarKind {
    fn parse(type_name: &str) -> Option<Self> {
        let kind = match type_name {
            "string" => Self::String,
            "int" | "int64" => Self::Int,
            "float" | "float64" | "double" => Self::Float,
            "bool" | "boolean" => Self::Bool,
            _ => return None,
        };
        Some(kind)
    }
}

/// Value type of a `map<string, X>` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapValueType {
    String,
    Class(String),
    Unknown(String),
}

/// A property's declared type after resolution against the class collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Scalar(ScalarKind),
    Class(String),
    Map(MapValueType),
    /// Neither a scalar, a map, nor a known class. Tolerated unless the
    /// model is validated strictly.
    Unknown(String),
}

impl PropertyType {
    /// Scalars win over class names, so a class called `string` is unreachable.
    #[must_use]
    pub fn resolve(type_name: &str, classes: &ClassCollection) -> Self {
        if let Some(kind) = ScalarKind::parse(type_name) {
            return Self::Scalar(kind);
        }
        if let Some(value_type) = parse_map_type(type_name) {
            let resolved = if value_type == "string" {
                MapValueType::String
            } else if classes.contains(value_type) {
                MapValueType::Class(value_type.to_string())
            } else {
                MapValueType::Unknown(value_type.to_string())
            };
            return Self::Map(resolved);
        }
        if classes.contains(type_name) {
            return Self::Class(type_name.to_string());
        }
        Self::Unknown(type_name.to_string())
    }
}

/// Extract `X` from `map<string, X>`. Keys are always strings.
fn parse_map_type(type_name: &str) -> Option<&str> {
    let inner: &str = type_name.trim().strip_prefix("map<")?.strip_suffix('>')?;
    let (key_type, value_type) = inner.split_once(',')?;
    if key_type.trim() != "string" {
        return None;
    }
    let value_type: &str = value_type.trim();
    if value_type.is_empty() {
        None
    } else {
        Some(value_type)
    }
}

#[derive(Deserialize)]
struct ModelDocument {
    classes: Vec<ClassModel>,
}

/// All classes of a model, keyed and iterated by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCollection {
    classes: BTreeMap<String, ClassModel>,
}

impl ClassCollection {
    /// Load a model from `{"classes": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `BuilderGenError::JsonError` for malformed JSON and
    /// `BuilderGenError::DuplicateClass` when two classes share a name.
    pub fn from_json(json: &str) -> Result<Self, BuilderGenError> {
        let document: ModelDocument = serde_json::from_str(json)?;
        Self::from_models(document.classes)
    }

    /// # Errors
    ///
    /// Returns `BuilderGenError::DuplicateClass` when two classes share a name.
    pub fn from_models<I>(models: I) -> Result<Self, BuilderGenError>
    where
        I: IntoIterator<Item = ClassModel>,
    {
        let mut classes: BTreeMap<String, ClassModel> = BTreeMap::new();
        for mut model in models {
            for (key, property) in &mut model.properties {
                property.name.clone_from(key);
            }
            if classes.contains_key(&model.name) {
                return Err(BuilderGenError::DuplicateClass(model.name));
            }
            classes.insert(model.name.clone(), model);
        }
        Ok(Self { classes })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassModel> {
        self.classes.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Classes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassModel> {
        self.classes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
