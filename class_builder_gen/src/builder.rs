//! Interpreter for the per-class builder semantics.
//!
//! [`Compiler::new`] turns a [`ClassCollection`] into one compiled builder per
//! class: required and allowed keys are listed, property types resolved,
//! patterns compiled. [`Compiler::build`] then converts dynamic documents
//! without touching the model again. Generated code performs the same steps;
//! both share the helpers in [`crate::runtime`].
//!
//! Failures below the top level never abort a parent. Each property
//! conversion yields a [`PropertyOutcome`] and the parent keeps whatever was
//! set.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::BuilderGenError;
use crate::instance::{FieldValue, Instance, Message, OneOf};
use crate::model::{ClassCollection, ClassModel, MapValueType, PropertyType, ScalarKind};
use crate::runtime::{self, Map};
use crate::settings::GenerateSettings;
use crate::validate;
use serde_json::Value;
use std::collections::BTreeMap;

/// Key filter of a map-typed property.
enum KeyFilter {
    All,
    /// An invalid pattern admits no key.
    Matching(runtime::KeyPattern),
}

impl KeyFilter {
    fn admits(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Matching(pattern) => pattern.admits(key),
        }
    }
}

enum MapValue {
    String,
    Class(String),
}

enum Conversion {
    Scalar(ScalarKind),
    Class(String),
    /// Nested class of a oneOf wrapper, offered the whole input mapping.
    Branch(String),
    Map { value: MapValue, filter: KeyFilter },
}

struct CompiledProperty {
    name: String,
    repeated: bool,
    conversion: Conversion,
}

struct MessageShape {
    required: Vec<String>,
    /// `None` for open classes.
    allowed: Option<Vec<String>>,
    properties: Vec<CompiledProperty>,
}

enum CompiledClass {
    StringArray,
    Blob,
    Message(MessageShape),
}

/// Result of converting one property, aggregated by the parent.
enum PropertyOutcome {
    /// Key not present, or nothing to store.
    Absent,
    Set(FieldValue),
    Branch(OneOf),
    /// Present but unusable; the field stays at its zero value.
    Rejected,
}

/// What a property conversion may look at.
struct Site<'a> {
    class_name: &'a str,
    map: &'a Map,
    value: &'a Value,
    path: &'a str,
}

/// Compiled builders for every class of a model.
pub struct Compiler {
    classes: BTreeMap<String, CompiledClass>,
}

impl Compiler {
    /// Compile every class of `classes`.
    ///
    /// # Errors
    ///
    /// Returns `BuilderGenError::InvalidModel` when
    /// `settings.deny_invalid_model` is set and the model has any issue.
    pub fn new(
        classes: &ClassCollection,
        settings: &GenerateSettings,
    ) -> Result<Self, BuilderGenError> {
        if settings.deny_invalid_model {
            validate::ensure_valid(classes)?;
        }
        let compiled: BTreeMap<String, CompiledClass> = classes
            .iter()
            .map(|class| (class.name.clone(), compile_class(class, classes)))
            .collect();
        tracing::debug!(classes = compiled.len(), "compiled class builders");
        Ok(Self { classes: compiled })
    }

    /// Names of all compiled classes, sorted.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Convert `value` into an instance of `class_name`.
    ///
    /// `Ok(None)` is a validation failure of the top-level value; soft
    /// failures below it are reported to `diagnostics`.
    ///
    /// # Errors
    ///
    /// Returns `BuilderGenError::UnknownClass` when the model has no such class.
    pub fn build(
        &self,
        class_name: &str,
        value: &Value,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Option<Instance>, BuilderGenError> {
        if !self.classes.contains_key(class_name) {
            return Err(BuilderGenError::UnknownClass(class_name.to_string()));
        }
        Ok(self.build_named(class_name, value, "", diagnostics))
    }

    fn build_named(
        &self,
        class_name: &str,
        value: &Value,
        path: &str,
        diagnostics: &mut dyn Diagnostics,
    ) -> Option<Instance> {
        match self.classes.get(class_name)? {
            CompiledClass::StringArray => {
                if let Some(s) = value.as_str() {
                    return Some(Instance::StringArray(vec![s.to_string()]));
                }
                diagnostics.report(Diagnostic::not_a_string(class_name, path, value));
                None
            }
            CompiledClass::Blob => Some(Instance::Blob(runtime::render_blob(value))),
            CompiledClass::Message(shape) => self
                .build_message(class_name, shape, value, path, diagnostics)
                .map(Instance::Message),
        }
    }

    fn build_message(
        &self,
        class_name: &str,
        shape: &MessageShape,
        value: &Value,
        path: &str,
        diagnostics: &mut dyn Diagnostics,
    ) -> Option<Message> {
        let Some(m) = runtime::unpack_map(value) else {
            diagnostics.report(Diagnostic::not_a_mapping(class_name, path, value));
            return None;
        };
        if !runtime::map_contains_all_keys(m, &shape.required) {
            return None;
        }
        if let Some(allowed) = &shape.allowed
            && !runtime::map_contains_only_keys(m, allowed)
        {
            return None;
        }

        let site = Site {
            class_name,
            map: m,
            value,
            path,
        };
        let mut message = Message::new(class_name);
        for property in &shape.properties {
            // First matching branch wins; later candidates are not tried.
            if matches!(property.conversion, Conversion::Branch(_)) && message.one_of.is_some() {
                continue;
            }
            match self.convert_property(&site, property, diagnostics) {
                PropertyOutcome::Set(field) => message.set(property.name.clone(), field),
                PropertyOutcome::Branch(branch) => message.one_of = Some(branch),
                PropertyOutcome::Absent | PropertyOutcome::Rejected => {}
            }
        }
        Some(message)
    }

    fn convert_property(
        &self,
        site: &Site<'_>,
        property: &CompiledProperty,
        diagnostics: &mut dyn Diagnostics,
    ) -> PropertyOutcome {
        match &property.conversion {
            Conversion::Branch(class_name) => {
                match self.build_named(class_name, site.value, site.path, diagnostics) {
                    Some(instance) => {
                        tracing::trace!(
                            class = site.class_name,
                            branch = %class_name,
                            "oneOf branch matched"
                        );
                        PropertyOutcome::Branch(OneOf {
                            class_name: class_name.clone(),
                            instance: Box::new(instance),
                        })
                    }
                    None => PropertyOutcome::Rejected,
                }
            }
            Conversion::Map { value, filter } => {
                self.convert_map(site, &property.name, value, filter, diagnostics)
            }
            Conversion::Scalar(kind) => {
                let Some(v) = site.map.get(&property.name) else {
                    return PropertyOutcome::Absent;
                };
                let path: String = runtime::child_path(site.path, &property.name);
                convert_scalar(
                    *kind,
                    property.repeated,
                    v,
                    site.class_name,
                    &property.name,
                    &path,
                    diagnostics,
                )
            }
            Conversion::Class(class_name) => {
                let Some(v) = site.map.get(&property.name) else {
                    return PropertyOutcome::Absent;
                };
                let path: String = runtime::child_path(site.path, &property.name);
                if property.repeated {
                    let Some(items) =
                        runtime::sequence(v, site.class_name, &property.name, &path, diagnostics)
                    else {
                        return PropertyOutcome::Rejected;
                    };
                    let built: Vec<Instance> = items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| {
                            let item_path: String = runtime::child_path(&path, &index.to_string());
                            self.build_named(class_name, item, &item_path, diagnostics)
                                .unwrap_or_else(|| self.zero_instance(class_name))
                        })
                        .collect();
                    PropertyOutcome::Set(FieldValue::Messages(built))
                } else {
                    match self.build_named(class_name, v, &path, diagnostics) {
                        Some(instance) => PropertyOutcome::Set(FieldValue::Message(Box::new(instance))),
                        None => PropertyOutcome::Rejected,
                    }
                }
            }
        }
    }

    /// Every key of the whole input mapping that passes `filter` becomes an entry.
    fn convert_map(
        &self,
        site: &Site<'_>,
        property: &str,
        value: &MapValue,
        filter: &KeyFilter,
        diagnostics: &mut dyn Diagnostics,
    ) -> PropertyOutcome {
        let entries = site.map.iter().filter(|(key, _)| filter.admits(key));
        let field: FieldValue = match value {
            MapValue::String => {
                let mut map: BTreeMap<String, String> = BTreeMap::new();
                for (key, v) in entries {
                    let path: String = runtime::child_path(site.path, key);
                    if let Some(s) =
                        runtime::scalar::<String>(v, site.class_name, property, &path, diagnostics)
                    {
                        map.insert(key.clone(), s);
                    }
                }
                if map.is_empty() {
                    return PropertyOutcome::Absent;
                }
                FieldValue::StringMap(map)
            }
            MapValue::Class(class_name) => {
                let mut map: BTreeMap<String, Instance> = BTreeMap::new();
                for (key, v) in entries {
                    let path: String = runtime::child_path(site.path, key);
                    let instance: Instance = self
                        .build_named(class_name, v, &path, diagnostics)
                        .unwrap_or_else(|| self.zero_instance(class_name));
                    map.insert(key.clone(), instance);
                }
                if map.is_empty() {
                    return PropertyOutcome::Absent;
                }
                FieldValue::MessageMap(map)
            }
        };
        PropertyOutcome::Set(field)
    }

    /// Zero value standing in for an element that failed to build.
    fn zero_instance(&self, class_name: &str) -> Instance {
        match self.classes.get(class_name) {
            Some(CompiledClass::StringArray) => Instance::StringArray(Vec::new()),
            Some(CompiledClass::Blob) => Instance::Blob(String::new()),
            Some(CompiledClass::Message(_)) | None => Instance::Message(Message::new(class_name)),
        }
    }
}

fn convert_scalar(
    kind: ScalarKind,
    repeated: bool,
    v: &Value,
    class_name: &str,
    property: &str,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> PropertyOutcome {
    let field: Option<FieldValue> = match (kind, repeated) {
        (ScalarKind::String, false) => {
            runtime::scalar::<String>(v, class_name, property, path, diagnostics)
                .map(FieldValue::String)
        }
        (ScalarKind::String, true) => {
            runtime::sequence(v, class_name, property, path, diagnostics)
                .map(|items| FieldValue::Strings(runtime::convert_array_to_string_array(items)))
        }
        (ScalarKind::Int, false) => {
            runtime::scalar::<i64>(v, class_name, property, path, diagnostics).map(FieldValue::Int)
        }
        (ScalarKind::Int, true) => {
            runtime::scalar_sequence::<i64>(v, class_name, property, path, diagnostics)
                .map(FieldValue::Ints)
        }
        (ScalarKind::Float, false) => {
            runtime::scalar::<f64>(v, class_name, property, path, diagnostics)
                .map(FieldValue::Float)
        }
        (ScalarKind::Float, true) => {
            runtime::scalar_sequence::<f64>(v, class_name, property, path, diagnostics)
                .map(FieldValue::Floats)
        }
        (ScalarKind::Bool, false) => {
            runtime::scalar::<bool>(v, class_name, property, path, diagnostics)
                .map(FieldValue::Bool)
        }
        (ScalarKind::Bool, true) => {
            runtime::scalar_sequence::<bool>(v, class_name, property, path, diagnostics)
                .map(FieldValue::Bools)
        }
    };
    field.map_or(PropertyOutcome::Rejected, PropertyOutcome::Set)
}

fn compile_class(class: &ClassModel, classes: &ClassCollection) -> CompiledClass {
    if class.is_string_array {
        return CompiledClass::StringArray;
    }
    if class.is_blob {
        return CompiledClass::Blob;
    }

    let mut properties: Vec<CompiledProperty> = Vec::with_capacity(class.properties.len());
    for property in class.properties.values() {
        let conversion: Conversion = match property.property_type(classes) {
            PropertyType::Scalar(kind) => Conversion::Scalar(kind),
            PropertyType::Class(name) if class.one_of_wrapper && !property.repeated => {
                Conversion::Branch(name)
            }
            PropertyType::Class(name) => Conversion::Class(name),
            PropertyType::Map(MapValueType::String) => Conversion::Map {
                value: MapValue::String,
                filter: key_filter(class, &property.name, property.pattern.as_deref()),
            },
            PropertyType::Map(MapValueType::Class(name)) => Conversion::Map {
                value: MapValue::Class(name),
                filter: key_filter(class, &property.name, property.pattern.as_deref()),
            },
            PropertyType::Map(MapValueType::Unknown(type_name))
            | PropertyType::Unknown(type_name) => {
                tracing::debug!(
                    class = %class.name,
                    property = %property.name,
                    type_name = %type_name,
                    "skipping property of unsupported type"
                );
                continue;
            }
        };
        properties.push(CompiledProperty {
            name: property.name.clone(),
            repeated: property.repeated,
            conversion,
        });
    }

    let allowed: Option<Vec<String>> =
        (!class.open).then(|| class.properties.keys().cloned().collect());

    CompiledClass::Message(MessageShape {
        required: class.required.iter().cloned().collect(),
        allowed,
        properties,
    })
}

fn key_filter(class: &ClassModel, property: &str, pattern: Option<&str>) -> KeyFilter {
    let Some(pattern) = pattern else {
        return KeyFilter::All;
    };
    let compiled = runtime::KeyPattern::new(pattern);
    if !compiled.is_valid() {
        tracing::warn!(
            class = %class.name,
            property,
            pattern,
            "pattern does not compile; map admits no keys"
        );
    }
    KeyFilter::Matching(compiled)
}
