//! Settings for model compilation and code generation.

/// Settings that control compilation and code generation behavior.
#[derive(Debug, Clone, Default)]
pub struct GenerateSettings {
    /// When true, fail before compiling or generating if the model violates
    /// any invariant. Collects all issues and returns them together.
    ///
    /// **Default: false (disabled).** Unknown property types are skipped and
    /// invalid patterns admit no keys.
    pub deny_invalid_model: bool,

    /// Module path where the target types already live (e.g. `crate::pb`).
    /// When `None`, the generator emits the types alongside the builders.
    pub types_module: Option<String>,

    /// Text written verbatim at the top of generated source.
    pub license: Option<String>,

    /// When set, the generated source gets a `version()` function returning it.
    pub version: Option<String>,
}
