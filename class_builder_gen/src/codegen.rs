//! Rust source emitter. For every class it writes a
//! `build_<snake>(value, path, diagnostics) -> Option<Type>` function that
//! performs the same steps as [`crate::Compiler::build`], plus the target
//! types unless [`GenerateSettings::types_module`] points at existing ones.

use crate::error::BuilderGenError;
use crate::model::{ClassCollection, ClassModel, MapValueType, PropertyModel, PropertyType, ScalarKind};
use crate::naming;
use crate::settings::GenerateSettings;
use crate::validate;
use std::io::{self, Write};

/// Lookups shared by all emitters.
struct Context<'a> {
    classes: &'a ClassCollection,
    types_module: Option<&'a str>,
}

impl Context<'_> {
    fn type_path(&self, class_name: &str) -> String {
        naming::qualified(self.types_module, &naming::type_name(class_name))
    }

    fn one_of_path(&self, class_name: &str) -> String {
        naming::qualified(self.types_module, &naming::one_of_enum_name(class_name))
    }

    fn is_branch(&self, class: &ClassModel, property: &PropertyModel) -> bool {
        class.one_of_wrapper
            && !property.repeated
            && matches!(property.property_type(self.classes), PropertyType::Class(_))
    }

    /// Distinct branch classes of a oneOf wrapper, in property order.
    fn branch_classes(&self, class: &ClassModel) -> Vec<String> {
        let mut branches: Vec<String> = Vec::new();
        for property in class.properties.values() {
            if !self.is_branch(class, property) {
                continue;
            }
            if let PropertyType::Class(name) = property.property_type(self.classes)
                && !branches.contains(&name)
            {
                branches.push(name);
            }
        }
        branches
    }
}

/// Comma-separated string literals, e.g. `"a", "b"`.
fn key_list<'k>(keys: impl Iterator<Item = &'k String>) -> String {
    keys.map(|key| format!("{key:?}"))
        .collect::<Vec<String>>()
        .join(", ")
}

fn emit_header<W: Write>(
    ctx: &Context<'_>,
    settings: &GenerateSettings,
    writer: &mut W,
) -> io::Result<()> {
    if let Some(license) = &settings.license {
        writeln!(writer, "{}", license.trim_end())?;
        writeln!(writer)?;
    }
    writeln!(writer, "// Generated by class-builder-gen. Do not edit manually.")?;
    writeln!(writer)?;

    let needs_diagnostic: bool = ctx.classes.iter().any(|class| !class.is_blob);
    if needs_diagnostic {
        writeln!(
            writer,
            "use class_builder_gen::diagnostics::{{Diagnostic, Diagnostics}};"
        )?;
    } else {
        writeln!(writer, "use class_builder_gen::diagnostics::Diagnostics;")?;
    }
    let needs_runtime: bool = ctx.classes.iter().any(|class| !class.is_string_array);
    if needs_runtime {
        writeln!(writer, "use class_builder_gen::runtime;")?;
    }
    writeln!(writer, "use serde_json::Value;")?;
    let needs_btreemap: bool = ctx.types_module.is_none()
        && ctx.classes.iter().any(|class| {
            !class.is_string_array
                && !class.is_blob
                && class
                    .properties
                    .values()
                    .any(|property| is_resolved_map(property, ctx))
        });
    if needs_btreemap {
        writeln!(writer, "use std::collections::BTreeMap;")?;
    }
    let needs_lazy_lock: bool = ctx.classes.iter().any(|class| {
        !class.is_string_array
            && !class.is_blob
            && class
                .properties
                .values()
                .any(|property| property.pattern.is_some() && is_resolved_map(property, ctx))
    });
    if needs_lazy_lock {
        writeln!(writer, "use std::sync::LazyLock;")?;
    }
    writeln!(writer)?;

    if let Some(version) = &settings.version {
        writeln!(writer, "pub fn version() -> &'static str {{")?;
        writeln!(writer, "    {version:?}")?;
        writeln!(writer, "}}")?;
        writeln!(writer)?;
    }
    Ok(())
}

fn is_resolved_map(property: &PropertyModel, ctx: &Context<'_>) -> bool {
    matches!(
        property.property_type(ctx.classes),
        PropertyType::Map(MapValueType::String | MapValueType::Class(_))
    )
}

fn emit_type<W: Write>(class: &ClassModel, ctx: &Context<'_>, writer: &mut W) -> io::Result<()> {
    let name: String = naming::type_name(&class.name);
    if class.is_string_array || class.is_blob {
        let value_type: &str = if class.is_string_array { "Vec<String>" } else { "String" };
        writeln!(writer, "#[derive(Debug, Clone, Default, PartialEq)]")?;
        writeln!(writer, "pub struct {name} {{")?;
        writeln!(writer, "    pub value: {value_type},")?;
        writeln!(writer, "}}")?;
        writeln!(writer)?;
        return Ok(());
    }

    let branches: Vec<String> = ctx.branch_classes(class);
    if !branches.is_empty() {
        writeln!(writer, "#[derive(Debug, Clone, PartialEq)]")?;
        writeln!(writer, "pub enum {} {{", naming::one_of_enum_name(&class.name))?;
        for branch in &branches {
            let variant: String = naming::type_name(branch);
            writeln!(writer, "    {variant}(Box<{variant}>),")?;
        }
        writeln!(writer, "}}")?;
        writeln!(writer)?;
    }

    writeln!(writer, "#[derive(Debug, Clone, Default, PartialEq)]")?;
    writeln!(writer, "pub struct {name} {{")?;
    for property in class.properties.values() {
        if ctx.is_branch(class, property) {
            continue;
        }
        if let Some(rust_type) = naming::rust_field_type(property, ctx.classes) {
            writeln!(
                writer,
                "    pub {}: {rust_type},",
                naming::field_name(&property.name)
            )?;
        }
    }
    if !branches.is_empty() {
        writeln!(
            writer,
            "    pub oneof: Option<{}>,",
            naming::one_of_enum_name(&class.name)
        )?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)?;
    Ok(())
}

fn emit_signature<W: Write>(
    writer: &mut W,
    class_name: &str,
    return_type: &str,
    params_used: bool,
) -> io::Result<()> {
    let prefix: &str = if params_used { "" } else { "_" };
    writeln!(writer, "pub fn {}(", naming::builder_fn_name(class_name))?;
    writeln!(writer, "    value: &Value,")?;
    writeln!(writer, "    {prefix}path: &str,")?;
    writeln!(writer, "    {prefix}diagnostics: &mut dyn Diagnostics,")?;
    writeln!(writer, ") -> Option<{return_type}> {{")?;
    Ok(())
}

fn emit_builder<W: Write>(class: &ClassModel, ctx: &Context<'_>, writer: &mut W) -> io::Result<()> {
    let type_path: String = ctx.type_path(&class.name);
    if class.is_string_array {
        emit_signature(writer, &class.name, &type_path, true)?;
        writeln!(writer, "    if let Some(s) = value.as_str() {{")?;
        writeln!(writer, "        return Some({type_path} {{")?;
        writeln!(writer, "            value: vec![s.to_string()],")?;
        writeln!(writer, "        }});")?;
        writeln!(writer, "    }}")?;
        writeln!(
            writer,
            "    diagnostics.report(Diagnostic::not_a_string({:?}, path, value));",
            class.name
        )?;
        writeln!(writer, "    None")?;
    } else if class.is_blob {
        emit_signature(writer, &class.name, &type_path, false)?;
        writeln!(writer, "    Some({type_path} {{")?;
        writeln!(writer, "        value: runtime::render_blob(value),")?;
        writeln!(writer, "    }})")?;
    } else {
        emit_signature(writer, &class.name, &type_path, true)?;
        emit_message_body(class, ctx, &type_path, writer)?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)?;
    Ok(())
}

fn emit_message_body<W: Write>(
    class: &ClassModel,
    ctx: &Context<'_>,
    type_path: &str,
    writer: &mut W,
) -> io::Result<()> {
    let resolved = |property: &PropertyModel| -> bool {
        !matches!(
            property.property_type(ctx.classes),
            PropertyType::Unknown(_) | PropertyType::Map(MapValueType::Unknown(_))
        )
    };
    let assigns: bool = class.properties.values().any(resolved);
    let reads_map: bool = !class.required.is_empty()
        || !class.open
        || class
            .properties
            .values()
            .any(|property| resolved(property) && !ctx.is_branch(class, property));

    emit_pattern_statics(class, ctx, writer)?;
    let binding: &str = if reads_map { "m" } else { "_m" };
    writeln!(writer, "    let Some({binding}) = runtime::unpack_map(value) else {{")?;
    writeln!(
        writer,
        "        diagnostics.report(Diagnostic::not_a_mapping({:?}, path, value));",
        class.name
    )?;
    writeln!(writer, "        return None;")?;
    writeln!(writer, "    }};")?;
    if !class.required.is_empty() {
        writeln!(
            writer,
            "    if !runtime::map_contains_all_keys(m, &[{}]) {{",
            key_list(class.required.iter())
        )?;
        writeln!(writer, "        return None;")?;
        writeln!(writer, "    }}")?;
    }
    if !class.open {
        if class.properties.is_empty() {
            writeln!(writer, "    if !m.is_empty() {{")?;
        } else {
            writeln!(
                writer,
                "    if !runtime::map_contains_only_keys(m, &[{}]) {{",
                key_list(class.properties.keys())
            )?;
        }
        writeln!(writer, "        return None;")?;
        writeln!(writer, "    }}")?;
    }

    let mutable: &str = if assigns { "mut " } else { "" };
    writeln!(writer, "    let {mutable}x = {type_path}::default();")?;
    for (index, property) in class.properties.values().enumerate() {
        emit_property(class, property, index + 1, ctx, writer)?;
    }
    writeln!(writer, "    Some(x)")?;
    Ok(())
}

fn emit_property<W: Write>(
    class: &ClassModel,
    property: &PropertyModel,
    field_number: usize,
    ctx: &Context<'_>,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "    // {}", naming::field_comment(property, field_number))?;
    let field: String = naming::field_name(&property.name);
    let key: String = format!("{:?}", property.name);
    let class_lit: String = format!("{:?}", class.name);

    match property.property_type(ctx.classes) {
        PropertyType::Scalar(kind) => {
            emit_scalar_property(kind, property.repeated, &field, &key, &class_lit, writer)?;
        }
        PropertyType::Class(name) if ctx.is_branch(class, property) => {
            let builder: String = naming::builder_fn_name(&name);
            let variant: String = naming::type_name(&name);
            writeln!(writer, "    if x.oneof.is_none() {{")?;
            writeln!(
                writer,
                "        if let Some(t) = {builder}(value, path, diagnostics) {{"
            )?;
            writeln!(
                writer,
                "            x.oneof = Some({}::{variant}(Box::new(t)));",
                ctx.one_of_path(&class.name)
            )?;
            writeln!(writer, "        }}")?;
            writeln!(writer, "    }}")?;
        }
        PropertyType::Class(name) if property.repeated => {
            let builder: String = naming::builder_fn_name(&name);
            writeln!(writer, "    if let Some(v) = m.get({key}) {{")?;
            writeln!(writer, "        let p = runtime::child_path(path, {key});")?;
            writeln!(
                writer,
                "        if let Some(a) = runtime::sequence(v, {class_lit}, {key}, &p, diagnostics) {{"
            )?;
            writeln!(writer, "            for (i, item) in a.iter().enumerate() {{")?;
            writeln!(
                writer,
                "                let item_path = runtime::child_path(&p, &i.to_string());"
            )?;
            writeln!(
                writer,
                "                x.{field}.push({builder}(item, &item_path, diagnostics).unwrap_or_default());"
            )?;
            writeln!(writer, "            }}")?;
            writeln!(writer, "        }}")?;
            writeln!(writer, "    }}")?;
        }
        PropertyType::Class(name) => {
            writeln!(writer, "    if let Some(v) = m.get({key}) {{")?;
            writeln!(writer, "        let p = runtime::child_path(path, {key});")?;
            writeln!(
                writer,
                "        x.{field} = {}(v, &p, diagnostics).map(Box::new);",
                naming::builder_fn_name(&name)
            )?;
            writeln!(writer, "    }}")?;
        }
        PropertyType::Map(MapValueType::String) => {
            emit_key_filter(property, writer)?;
            writeln!(writer, "        let p = runtime::child_path(path, k);")?;
            writeln!(
                writer,
                "        if let Some(s) = runtime::scalar::<String>(v, {class_lit}, {key}, &p, diagnostics) {{"
            )?;
            writeln!(writer, "            x.{field}.insert(k.clone(), s);")?;
            writeln!(writer, "        }}")?;
            writeln!(writer, "    }}")?;
        }
        PropertyType::Map(MapValueType::Class(name)) => {
            emit_key_filter(property, writer)?;
            writeln!(writer, "        let p = runtime::child_path(path, k);")?;
            writeln!(
                writer,
                "        x.{field}.insert(k.clone(), {}(v, &p, diagnostics).unwrap_or_default());",
                naming::builder_fn_name(&name)
            )?;
            writeln!(writer, "    }}")?;
        }
        PropertyType::Map(MapValueType::Unknown(type_name)) | PropertyType::Unknown(type_name) => {
            writeln!(writer, "    // unsupported type `{type_name}`: not converted")?;
        }
    }
    Ok(())
}

fn emit_scalar_property<W: Write>(
    kind: ScalarKind,
    repeated: bool,
    field: &str,
    key: &str,
    class_lit: &str,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "    if let Some(v) = m.get({key}) {{")?;
    writeln!(writer, "        let p = runtime::child_path(path, {key});")?;
    match (kind, repeated) {
        (ScalarKind::String, true) => {
            writeln!(
                writer,
                "        if let Some(a) = runtime::sequence(v, {class_lit}, {key}, &p, diagnostics) {{"
            )?;
            writeln!(
                writer,
                "            x.{field} = runtime::convert_array_to_string_array(a);"
            )?;
        }
        (kind, true) => {
            writeln!(
                writer,
                "        if let Some(a) = runtime::scalar_sequence::<{}>(v, {class_lit}, {key}, &p, diagnostics) {{",
                naming::scalar_rust_type(kind)
            )?;
            writeln!(writer, "            x.{field} = a;")?;
        }
        (kind, false) => {
            writeln!(
                writer,
                "        if let Some(s) = runtime::scalar::<{}>(v, {class_lit}, {key}, &p, diagnostics) {{",
                naming::scalar_rust_type(kind)
            )?;
            writeln!(writer, "            x.{field} = s;")?;
        }
    }
    writeln!(writer, "        }}")?;
    writeln!(writer, "    }}")?;
    Ok(())
}

fn pattern_static_name(property: &PropertyModel) -> String {
    format!("{}_PATTERN", naming::field_name(&property.name).to_uppercase())
}

/// One `LazyLock` static per map pattern, so each compiles once per process.
fn emit_pattern_statics<W: Write>(
    class: &ClassModel,
    ctx: &Context<'_>,
    writer: &mut W,
) -> io::Result<()> {
    for property in class.properties.values() {
        let Some(pattern) = &property.pattern else {
            continue;
        };
        if !is_resolved_map(property, ctx) {
            continue;
        }
        writeln!(
            writer,
            "    static {}: LazyLock<runtime::KeyPattern> =",
            pattern_static_name(property)
        )?;
        writeln!(
            writer,
            "        LazyLock::new(|| runtime::KeyPattern::new({pattern:?}));"
        )?;
    }
    Ok(())
}

/// Opens the loop over the whole input mapping, skipping keys the property's
/// pattern rejects.
fn emit_key_filter<W: Write>(property: &PropertyModel, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "    for (k, v) in m {{")?;
    if property.pattern.is_some() {
        writeln!(
            writer,
            "        if !{}.admits(k) {{",
            pattern_static_name(property)
        )?;
        writeln!(writer, "            continue;")?;
        writeln!(writer, "        }}")?;
    }
    Ok(())
}

/// Write builder source for `classes` to `writer`.
///
/// # Errors
///
/// Returns `BuilderGenError::InvalidModel` in strict mode, a generic error
/// for an empty model, and `BuilderGenError::IoError` when writing fails.
pub fn generate_classes_to_writer<W: Write>(
    classes: &ClassCollection,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), BuilderGenError> {
    if settings.deny_invalid_model {
        validate::ensure_valid(classes)?;
    } else {
        for issue in validate::name_issues(classes) {
            tracing::warn!(%issue, "generated source will not compile");
        }
    }
    if classes.is_empty() {
        return Err(BuilderGenError::GenericError(
            "No classes to generate (model is empty)".to_string(),
        ));
    }

    let ctx = Context {
        classes,
        types_module: settings.types_module.as_deref(),
    };
    emit_header(&ctx, settings, writer)?;
    if ctx.types_module.is_none() {
        for class in classes.iter() {
            emit_type(class, &ctx, writer)?;
        }
    }
    for class in classes.iter() {
        emit_builder(class, &ctx, writer)?;
    }
    tracing::debug!(classes = classes.len(), "generated builder source");
    Ok(())
}

/// Parse a JSON class model and write builder source to `writer`.
///
/// # Errors
///
/// Fails on malformed JSON or duplicate classes, and otherwise as
/// [`generate_classes_to_writer`] does.
pub fn generate_to_writer<W: Write>(
    model_json: &str,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), BuilderGenError> {
    let classes: ClassCollection = ClassCollection::from_json(model_json)?;
    generate_classes_to_writer(&classes, writer, settings)
}
