//! Typed instances produced by the interpreter.
//!
//! An [`Instance`] mirrors what a generated builder returns for the same
//! class: string arrays and blobs hold their single value, messages hold the
//! fields that were set. A field missing from [`Message::fields`] is at its
//! zero value.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Instance {
    StringArray(Vec<String>),
    Blob(String),
    Message(Message),
}

impl Instance {
    #[must_use]
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&str> {
        match self {
            Self::Blob(text) => Some(text),
            _ => None,
        }
    }
}

/// Instance of a map-backed class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    #[serde(rename = "class")]
    pub class_name: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,

    /// Active branch of a oneOf wrapper.
    #[serde(rename = "oneof", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<OneOf>,
}

impl Message {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Field by property name; `None` means zero-valued.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&FieldValue> {
        self.fields.get(property)
    }

    pub fn set(&mut self, property: impl Into<String>, value: FieldValue) {
        self.fields.insert(property.into(), value);
    }

    /// True when no field is set and no branch is active.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fields.is_empty() && self.one_of.is_none()
    }
}

/// The selected branch of a discriminated union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneOf {
    #[serde(rename = "class")]
    pub class_name: String,
    pub instance: Box<Instance>,
}

/// Value of a set field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Strings(Vec<String>),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Bools(Vec<bool>),
    Message(Box<Instance>),
    Messages(Vec<Instance>),
    StringMap(BTreeMap<String, String>),
    MessageMap(BTreeMap<String, Instance>),
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::Strings(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Message(instance) => Some(instance),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_instances(&self) -> Option<&[Instance]> {
        match self {
            Self::Messages(instances) => Some(instances),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_string_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::StringMap(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_instance_map(&self) -> Option<&BTreeMap<String, Instance>> {
        match self {
            Self::MessageMap(map) => Some(map),
            _ => None,
        }
    }
}
