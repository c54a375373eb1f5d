//! Tagged unions nested inside generated structures. Each live alternative
//! gets a `holds_*` predicate and an `as_*` accessor, primitives also a
//! `set_*` setter.

use lsp_bindgen_schema::TypeSpec;

use crate::{
    builder::CodeBuilder,
    diagnostics::{ConstructKind, Diagnostics},
    error::SchemaError,
    resolver::{TypeResolver, ValueKind, LITERAL_STUB},
    utils::is_identifier,
};

/// Accessor suffix of alternative `index`. Compound alternatives carry their
/// structural kind so they never clash with a plain alternative of the same
/// element name.
pub fn alternative_label(spec: &TypeSpec, index: usize) -> String {
    match spec {
        TypeSpec::Base { name } | TypeSpec::Reference { name } => name.clone(),
        TypeSpec::Array { element } => format!("array_{}", alternative_label(element, index)),
        TypeSpec::Map { .. } => format!("map_Map{}", index),
        TypeSpec::Or { .. } => format!("or_Union{}", index),
        TypeSpec::Tuple { .. } => format!("tuple_Tuple{}", index),
        TypeSpec::Literal { .. } => format!("literal_Literal{}", index),
        TypeSpec::StringLiteral { .. } => format!("stringLiteral_Literal{}", index),
    }
}

/// Writes union `name`, scoped inside `wrapped_in`, over the already
/// null-filtered `alternatives`. Declarations go to `hdr_buf` at its current
/// indentation, out-of-line definitions to `src_buf`.
pub fn generate_union(
    resolver: &TypeResolver<'_>,
    diags: &mut Diagnostics,
    name: &str,
    alternatives: &[TypeSpec],
    wrapped_in: &str,
    hdr_buf: &mut CodeBuilder,
    src_buf: &mut CodeBuilder,
) -> Result<(), SchemaError> {
    let qualified = if wrapped_in.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", wrapped_in, name)
    };

    // Template arguments only; gaps are reported per alternative below.
    let mut scratch = Diagnostics::new();
    let sub_types = alternatives
        .iter()
        .map(|alt| resolver.type_name(alt, &qualified, &mut scratch))
        .collect::<Result<Vec<_>, _>>()?;

    hdr_buf.write(&format!(
        "struct {} : detail::UnionStructWrapper<{}> {{",
        name,
        sub_types.join(", ")
    ));
    hdr_buf.indent();
    hdr_buf.write("using UnionStructWrapper::UnionStructWrapper;");
    hdr_buf.newline();

    let mut labels: Vec<String> = Vec::new();
    for (i, alt) in alternatives.iter().enumerate() {
        let skipped = match alt {
            TypeSpec::Literal { .. } | TypeSpec::StringLiteral { .. } => Some(ConstructKind::LiteralInUnion),
            TypeSpec::Tuple { .. } => Some(ConstructKind::TupleInUnion),
            _ => None,
        };
        if let Some(kind) = skipped {
            diags.record(&qualified, kind);
            continue;
        }

        let kind = resolver.classify(alt, &qualified)?;
        let label = match kind {
            ValueKind::Union(_) => format!("or_Union{}", i),
            _ => alternative_label(alt, i),
        };
        if !is_identifier(&label) {
            hdr_buf.unindent();
            return Err(SchemaError::InvalidIdentifier { owner: qualified, name: label });
        }
        if labels.contains(&label) {
            hdr_buf.unindent();
            return Err(SchemaError::NameCollision { owner: qualified, name: label });
        }
        labels.push(label.clone());

        let (typename, getter) = if let TypeSpec::Map { .. } = alt {
            diags.record(&qualified, ConstructKind::MapInUnion);
            (resolver.type_name(alt, &qualified, diags)?, "return {};".to_string())
        } else {
            match &kind {
                ValueKind::Union(items) => {
                    let sub_name = format!("Union{}", i);
                    generate_union(resolver, diags, &sub_name, items, &qualified, hdr_buf, src_buf)?;
                    (format!("{}::{}", qualified, sub_name), "return {n_};".to_string())
                }
                ValueKind::Primitive => {
                    let t = resolver.type_name(alt, &qualified, diags)?;
                    let getter = format!("return detail::NodeAsPrimitive<{}>(n_);", t);
                    (t, getter)
                }
                ValueKind::Enumeration => {
                    let t = resolver.type_name(alt, &qualified, diags)?;
                    let getter = format!("return detail::DeserializeEnum<{}>(n_);", t);
                    (t, getter)
                }
                ValueKind::Aggregate => (resolver.type_name(alt, &qualified, diags)?, "return {n_};".to_string()),
                ValueKind::Placeholder => {
                    (resolver.type_name(alt, &qualified, diags)?, format!("return {}{{}};", LITERAL_STUB))
                }
            }
        };

        hdr_buf.write(&format!("[[nodiscard]] bool holds_{}() const;", label));
        src_buf.write(&format!(
            "bool {}::holds_{}() const {{ return detail::NodeHolds<{}>(n_); }}",
            qualified, label, typename
        ));

        hdr_buf.write(&format!("[[nodiscard]] {} as_{}();", typename, label));
        src_buf.write(&format!("{} {}::as_{}() {{ {} }}", typename, qualified, label, getter));

        if kind == ValueKind::Primitive {
            hdr_buf.write(&format!("void set_{}({} val);", label, typename));
            src_buf.write(&format!(
                "void {}::set_{}({} val) {{ detail::SetPrimitive(n_, val); }}",
                qualified, label, typename
            ));
        }
        hdr_buf.newline();
    }

    hdr_buf.unindent();
    hdr_buf.write("};");
    hdr_buf.newline();

    tracing::trace!(union = %qualified, alternatives = labels.len(), "union");
    Ok(())
}
