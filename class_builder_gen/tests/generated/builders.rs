// Generated by class-builder-gen. Do not edit manually.

use class_builder_gen::diagnostics::{Diagnostic, Diagnostics};
use class_builder_gen::runtime;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Any {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub info: Option<Box<Info>>,
    pub paths: Option<Box<Paths>>,
    pub ports: Vec<i64>,
    pub schema: Option<Box<Schema>>,
    pub schemes: Vec<String>,
    pub swagger: String,
    pub tags: Vec<Tag>,
    pub vendor_extension: BTreeMap<String, Any>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub draft: bool,
    pub ratio: f64,
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inline {
    pub type_: Option<Box<TypeItem>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonReference {
    pub _ref: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub extension: BTreeMap<String, String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    pub path: BTreeMap<String, PathItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOneof {
    Inline(Box<Inline>),
    JsonReference(Box<JsonReference>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub oneof: Option<SchemaOneof>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeItem {
    pub value: Vec<String>,
}

pub fn build_any(
    value: &Value,
    _path: &str,
    _diagnostics: &mut dyn Diagnostics,
) -> Option<Any> {
    Some(Any {
        value: runtime::render_blob(value),
    })
}

pub fn build_document(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Document> {
    static VENDOR_EXTENSION_PATTERN: LazyLock<runtime::KeyPattern> =
        LazyLock::new(|| runtime::KeyPattern::new("^x-"));
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("Document", path, value));
        return None;
    };
    if !runtime::map_contains_all_keys(m, &["swagger"]) {
        return None;
    }
    let mut x = Document::default();
    // Info info = 1;
    if let Some(v) = m.get("info") {
        let p = runtime::child_path(path, "info");
        x.info = build_info(v, &p, diagnostics).map(Box::new);
    }
    // Paths paths = 2;
    if let Some(v) = m.get("paths") {
        let p = runtime::child_path(path, "paths");
        x.paths = build_paths(v, &p, diagnostics).map(Box::new);
    }
    // repeated int64 ports = 3;
    if let Some(v) = m.get("ports") {
        let p = runtime::child_path(path, "ports");
        if let Some(a) = runtime::scalar_sequence::<i64>(v, "Document", "ports", &p, diagnostics) {
            x.ports = a;
        }
    }
    // Schema schema = 4;
    if let Some(v) = m.get("schema") {
        let p = runtime::child_path(path, "schema");
        x.schema = build_schema(v, &p, diagnostics).map(Box::new);
    }
    // repeated string schemes = 5;
    if let Some(v) = m.get("schemes") {
        let p = runtime::child_path(path, "schemes");
        if let Some(a) = runtime::sequence(v, "Document", "schemes", &p, diagnostics) {
            x.schemes = runtime::convert_array_to_string_array(a);
        }
    }
    // string swagger = 6;
    if let Some(v) = m.get("swagger") {
        let p = runtime::child_path(path, "swagger");
        if let Some(s) = runtime::scalar::<String>(v, "Document", "swagger", &p, diagnostics) {
            x.swagger = s;
        }
    }
    // repeated Tag tags = 7;
    if let Some(v) = m.get("tags") {
        let p = runtime::child_path(path, "tags");
        if let Some(a) = runtime::sequence(v, "Document", "tags", &p, diagnostics) {
            for (i, item) in a.iter().enumerate() {
                let item_path = runtime::child_path(&p, &i.to_string());
                x.tags.push(build_tag(item, &item_path, diagnostics).unwrap_or_default());
            }
        }
    }
    // map<string, Any> vendor_extension = 8;
    for (k, v) in m {
        if !VENDOR_EXTENSION_PATTERN.admits(k) {
            continue;
        }
        let p = runtime::child_path(path, k);
        x.vendor_extension.insert(k.clone(), build_any(v, &p, diagnostics).unwrap_or_default());
    }
    Some(x)
}

pub fn build_info(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Info> {
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("Info", path, value));
        return None;
    };
    if !runtime::map_contains_all_keys(m, &["title"]) {
        return None;
    }
    if !runtime::map_contains_only_keys(m, &["draft", "ratio", "title", "version"]) {
        return None;
    }
    let mut x = Info::default();
    // bool draft = 1;
    if let Some(v) = m.get("draft") {
        let p = runtime::child_path(path, "draft");
        if let Some(s) = runtime::scalar::<bool>(v, "Info", "draft", &p, diagnostics) {
            x.draft = s;
        }
    }
    // float ratio = 2;
    if let Some(v) = m.get("ratio") {
        let p = runtime::child_path(path, "ratio");
        if let Some(s) = runtime::scalar::<f64>(v, "Info", "ratio", &p, diagnostics) {
            x.ratio = s;
        }
    }
    // string title = 3;
    if let Some(v) = m.get("title") {
        let p = runtime::child_path(path, "title");
        if let Some(s) = runtime::scalar::<String>(v, "Info", "title", &p, diagnostics) {
            x.title = s;
        }
    }
    // string version = 4;
    if let Some(v) = m.get("version") {
        let p = runtime::child_path(path, "version");
        if let Some(s) = runtime::scalar::<String>(v, "Info", "version", &p, diagnostics) {
            x.version = s;
        }
    }
    Some(x)
}

pub fn build_inline(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Inline> {
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("Inline", path, value));
        return None;
    };
    if !runtime::map_contains_all_keys(m, &["type"]) {
        return None;
    }
    let mut x = Inline::default();
    // TypeItem type = 1;
    if let Some(v) = m.get("type") {
        let p = runtime::child_path(path, "type");
        x.type_ = build_type_item(v, &p, diagnostics).map(Box::new);
    }
    Some(x)
}

pub fn build_json_reference(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<JsonReference> {
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("JsonReference", path, value));
        return None;
    };
    if !runtime::map_contains_all_keys(m, &["$ref"]) {
        return None;
    }
    let mut x = JsonReference::default();
    // string _ref = 1;
    if let Some(v) = m.get("$ref") {
        let p = runtime::child_path(path, "$ref");
        if let Some(s) = runtime::scalar::<String>(v, "JsonReference", "$ref", &p, diagnostics) {
            x._ref = s;
        }
    }
    Some(x)
}

pub fn build_path_item(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<PathItem> {
    static EXTENSION_PATTERN: LazyLock<runtime::KeyPattern> =
        LazyLock::new(|| runtime::KeyPattern::new("^x-"));
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("PathItem", path, value));
        return None;
    };
    let mut x = PathItem::default();
    // map<string, string> extension = 1;
    for (k, v) in m {
        if !EXTENSION_PATTERN.admits(k) {
            continue;
        }
        let p = runtime::child_path(path, k);
        if let Some(s) = runtime::scalar::<String>(v, "PathItem", "extension", &p, diagnostics) {
            x.extension.insert(k.clone(), s);
        }
    }
    // string summary = 2;
    if let Some(v) = m.get("summary") {
        let p = runtime::child_path(path, "summary");
        if let Some(s) = runtime::scalar::<String>(v, "PathItem", "summary", &p, diagnostics) {
            x.summary = s;
        }
    }
    Some(x)
}

pub fn build_paths(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Paths> {
    static PATH_PATTERN: LazyLock<runtime::KeyPattern> =
        LazyLock::new(|| runtime::KeyPattern::new("^/"));
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("Paths", path, value));
        return None;
    };
    let mut x = Paths::default();
    // map<string, PathItem> path = 1;
    for (k, v) in m {
        if !PATH_PATTERN.admits(k) {
            continue;
        }
        let p = runtime::child_path(path, k);
        x.path.insert(k.clone(), build_path_item(v, &p, diagnostics).unwrap_or_default());
    }
    Some(x)
}

pub fn build_schema(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Schema> {
    let Some(_m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("Schema", path, value));
        return None;
    };
    let mut x = Schema::default();
    // Inline inline = 1;
    if x.oneof.is_none() {
        if let Some(t) = build_inline(value, path, diagnostics) {
            x.oneof = Some(SchemaOneof::Inline(Box::new(t)));
        }
    }
    // JsonReference reference = 2;
    if x.oneof.is_none() {
        if let Some(t) = build_json_reference(value, path, diagnostics) {
            x.oneof = Some(SchemaOneof::JsonReference(Box::new(t)));
        }
    }
    Some(x)
}

pub fn build_tag(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<Tag> {
    let Some(m) = runtime::unpack_map(value) else {
        diagnostics.report(Diagnostic::not_a_mapping("Tag", path, value));
        return None;
    };
    if !runtime::map_contains_all_keys(m, &["name"]) {
        return None;
    }
    if !runtime::map_contains_only_keys(m, &["name"]) {
        return None;
    }
    let mut x = Tag::default();
    // string name = 1;
    if let Some(v) = m.get("name") {
        let p = runtime::child_path(path, "name");
        if let Some(s) = runtime::scalar::<String>(v, "Tag", "name", &p, diagnostics) {
            x.name = s;
        }
    }
    Some(x)
}

pub fn build_type_item(
    value: &Value,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<TypeItem> {
    if let Some(s) = value.as_str() {
        return Some(TypeItem {
            value: vec![s.to_string()],
        });
    }
    diagnostics.report(Diagnostic::not_a_string("TypeItem", path, value));
    None
}

