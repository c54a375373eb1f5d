//! lsp-bindgen
//!
//! Generates C++ accessor bindings from the Language Server Protocol
//! meta-model.
//!
//! - `generate_from_path` loads a `metaModel.json`, compiles it and writes the artifacts
//! - `check_path` runs every stage except the write and reports the known gaps
//! - Re-exports of the schema model, the compiler entry points and `Options`

use std::path::{Path, PathBuf};

pub use lsp_bindgen_compiler::{
    compile_schema_to_cpp, emission_names, write_bindings, Bindings, BindgenError, Builtin, ConstructKind,
    Options, SchemaError, UnsupportedConstruct,
};
pub use lsp_bindgen_schema::{Schema, Structure, Enumeration, TypeAlias, TypeSpec};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub written: Vec<PathBuf>,
    pub gaps:    Vec<UnsupportedConstruct>,
}

/// Loads options from `path`, or the defaults when no path is given.
pub fn load_options(path: Option<&Path>) -> Result<Options, BindgenError> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading options");
            Options::from_path(path)
        }
        None => Ok(Options::default()),
    }
}

pub fn load_schema(model: &Path) -> Result<Schema, BindgenError> {
    let schema = Schema::from_path(model)?;
    tracing::debug!(
        structures = schema.structures.len(),
        enumerations = schema.enumerations.len(),
        aliases = schema.type_aliases.len(),
        "loaded meta-model"
    );
    Ok(schema)
}

/// Compiles the meta-model at `model` and writes the bindings under `out_dir`.
pub fn generate_from_path(model: &Path, out_dir: &Path, options: &Options) -> Result<Generated, BindgenError> {
    let schema = load_schema(model)?;
    let bindings = compile_schema_to_cpp(&schema, options)?;
    let written = write_bindings(&bindings, out_dir, options)?;
    Ok(Generated { written, gaps: bindings.gaps })
}

/// Compiles the meta-model at `model` without writing anything.
pub fn check_path(model: &Path, options: &Options) -> Result<Vec<UnsupportedConstruct>, BindgenError> {
    let schema = load_schema(model)?;
    Ok(compile_schema_to_cpp(&schema, options)?.gaps)
}

/// Serializes `gaps` as a pretty-printed JSON array.
pub fn gaps_to_json(gaps: &[UnsupportedConstruct]) -> Result<String, BindgenError> {
    Ok(serde_json::to_string_pretty(gaps)?)
}

pub mod error {
    pub use lsp_bindgen_compiler::error::{BindgenError, SchemaError};
}

pub mod schema {
    pub use lsp_bindgen_schema::*;
}
