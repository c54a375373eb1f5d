//! Assembles the synthesized registry into the generated C++ artifacts and
//! writes them to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lsp_bindgen_schema::Schema;
use tempfile::NamedTempFile;

use crate::{
    builder::{CodeBuilder, Registry, RegistryEntry},
    diagnostics::{Diagnostics, UnsupportedConstruct},
    error::{BindgenError, SchemaError},
    options::Options,
    order::emission_order,
    resolver::{TypeResolver, LITERAL_STUB},
    traits::Synthesize,
    verifier::verify_schema,
};

/// Generated artifacts of one run, plus the known gaps in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub header: String,
    /// `None` when the definitions were combined into the header.
    pub source: Option<String>,
    pub gaps:   Vec<UnsupportedConstruct>,
}

/// Verifies `schema` and synthesizes one registry entry per named type:
/// enumerations, then type aliases, then structures, each in declaration
/// order.
pub fn build_registry(
    schema: &Schema,
    options: &Options,
    diags: &mut Diagnostics,
) -> Result<Registry, SchemaError> {
    verify_schema(schema)?;

    let resolver = TypeResolver::new(schema, options);
    let mut registry = Registry::new();
    for enumeration in &schema.enumerations {
        registry.insert(enumeration.synthesize(&resolver, diags)?)?;
    }
    for alias in &schema.type_aliases {
        registry.insert(alias.synthesize(&resolver, diags)?)?;
    }
    for structure in &schema.structures {
        registry.insert(structure.synthesize(&resolver, diags)?)?;
    }
    Ok(registry)
}

/// Names of the emitted entries, in emission order.
pub fn emission_names(schema: &Schema, options: &Options) -> Result<Vec<String>, SchemaError> {
    let registry = build_registry(schema, options, &mut Diagnostics::new())?;
    let order = emission_order(&registry)?;
    Ok(order.into_iter().map(|entry| entry.name.clone()).collect())
}

/// Compiles `schema` into C++ bindings. Nothing is written; the output only
/// depends on `schema` and `options`.
pub fn compile_schema_to_cpp(schema: &Schema, options: &Options) -> Result<Bindings, SchemaError> {
    let mut diags = Diagnostics::new();
    let registry = build_registry(schema, options, &mut diags)?;
    let order = emission_order(&registry)?;

    let combined = options.source_path.is_none();
    let header = build_header(&registry, &order, options, combined);
    let source = if combined { None } else { Some(build_source(&order, options)) };

    let gaps = diags.into_gaps();
    for gap in &gaps {
        tracing::warn!(%gap, "unsupported construct");
    }
    tracing::info!(
        entries = order.len(),
        gaps = gaps.len(),
        combined,
        "compiled schema"
    );

    Ok(Bindings { header, source, gaps })
}

fn build_header(registry: &Registry, order: &[&RegistryEntry], options: &Options, combined: bool) -> String {
    let mut buf = CodeBuilder::new();
    buf.write("#pragma once");
    buf.newline();
    for include in &options.includes {
        buf.write(&format!("#include <{}>", include));
    }
    buf.newline();
    buf.write(&format!("#include \"{}\"", options.base_header));
    buf.newline();
    buf.write("// NOLINTBEGIN(readability-identifier-naming)");
    buf.newline();
    buf.write(&format!("namespace {} {{", options.namespace));
    buf.newline();
    for builtin in &options.builtins {
        buf.write(&format!("using {} = {};", builtin.name, builtin.definition));
    }
    buf.write(&format!("struct {} {{}};", LITERAL_STUB));
    buf.newline();

    for entry in order {
        buf.append(&entry.header);
    }
    if combined {
        for entry in order {
            buf.append(&inline_definitions(&entry.implementation));
        }
    }

    buf.write(&format!("}}  // namespace {}", options.namespace));
    buf.newline();

    for entry in registry.entries().filter(|e| !e.external && !e.appendix.is_empty()) {
        buf.append(&entry.appendix);
        buf.newline();
    }
    buf.write("// NOLINTEND(readability-identifier-naming)");
    buf.build()
}

/// Marks every top-level definition in `block` `inline`, so the combined
/// header can be included from more than one translation unit.
fn inline_definitions(block: &CodeBuilder) -> CodeBuilder {
    let mut out = CodeBuilder::new();
    for line in block.as_str().lines() {
        let starts_definition = !line.is_empty()
            && !line.starts_with(char::is_whitespace)
            && !line.starts_with('}')
            && !line.starts_with("template");
        if starts_definition {
            out.write(&format!("inline {}", line));
        } else {
            out.write(line);
        }
    }
    out
}

fn build_source(order: &[&RegistryEntry], options: &Options) -> String {
    let header_name = options
        .header_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut buf = CodeBuilder::new();
    buf.write(&format!("#include \"{}\"", header_name));
    buf.newline();
    buf.write(&format!("namespace {} {{", options.namespace));
    buf.newline();
    for entry in order {
        buf.append(&entry.implementation);
    }
    buf.write(&format!("}}  // namespace {}", options.namespace));
    buf.build()
}

/// Writes `bindings` under `out_dir`, returning the written paths. Every
/// file is written to a temporary sibling first and then renamed into
/// place, so an interrupted run never leaves a partial artifact behind.
pub fn write_bindings(
    bindings: &Bindings,
    out_dir: &Path,
    options: &Options,
) -> Result<Vec<PathBuf>, BindgenError> {
    let mut written = Vec::new();

    let header_path = out_dir.join(&options.header_path);
    write_atomic(&header_path, &bindings.header)?;
    written.push(header_path);

    if let (Some(source), Some(source_path)) = (&bindings.source, &options.source_path) {
        let source_path = out_dir.join(source_path);
        write_atomic(&source_path, source)?;
        written.push(source_path);
    }

    Ok(written)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), BindgenError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}
