//! Structures: an accessor-bearing wrapper over a document node, with
//! inherited fields flattened in and nested unions synthesized on demand.

use lsp_bindgen_schema::{Property, SchemaIndex, Structure, TypeSpec};

use crate::{
    builder::{CodeBuilder, RegistryEntry},
    diagnostics::{ConstructKind, Diagnostics},
    error::SchemaError,
    resolver::{optional_of, referenced_names, TypeResolver, ValueKind},
    traits::Synthesize,
    unions::generate_union,
    utils::{doc_block, escape_cpp_keyword, line_comments, quote},
    verifier::{cycle_from, parent_structure},
};

/// Own properties followed by every inherited property, parents taken in
/// `extends` then `mixins` order and flattened recursively. The first
/// occurrence of a name wins, so own properties shadow inherited ones and
/// earlier parents shadow later ones. Shadowing does not check types.
pub fn flatten_fields<'a>(
    structure: &'a Structure,
    index: &SchemaIndex<'a>,
) -> Result<Vec<&'a Property>, SchemaError> {
    fn collect<'a>(
        structure: &'a Structure,
        index: &SchemaIndex<'a>,
        stack: &mut Vec<&'a str>,
        out: &mut Vec<&'a Property>,
    ) -> Result<(), SchemaError> {
        if stack.contains(&structure.name.as_str()) {
            return Err(SchemaError::InheritanceCycle(cycle_from(stack, &structure.name)));
        }
        stack.push(&structure.name);
        for prop in &structure.properties {
            if !out.iter().any(|seen| seen.name == prop.name) {
                out.push(prop);
            }
        }
        for parent in structure.parents() {
            let parent = parent_structure(structure, parent, index)?;
            collect(parent, index, stack, out)?;
        }
        stack.pop();
        Ok(())
    }

    let mut out = Vec::new();
    collect(structure, index, &mut Vec::new(), &mut out)?;
    Ok(out)
}

/// Expression that reads the node of field `prop` for `kind`.
fn getter(kind: &ValueKind, inner: &str, node: &str) -> String {
    match kind {
        ValueKind::Primitive   => format!("detail::NodeAsPrimitive<{}>({})", inner, node),
        ValueKind::Enumeration => format!("detail::DeserializeEnum<{}>({})", inner, node),
        ValueKind::Union(_) | ValueKind::Aggregate => format!("{}({})", inner, node),
        ValueKind::Placeholder => format!("{}{{}}", inner),
    }
}

/// Reserves `member` in the scope of structure `owner`.
fn claim(members: &mut Vec<String>, owner: &str, member: String) -> Result<(), SchemaError> {
    if members.contains(&member) {
        return Err(SchemaError::NameCollision { owner: owner.to_string(), name: member });
    }
    members.push(member);
    Ok(())
}

impl Synthesize for Structure {
    fn synthesize(
        &self,
        resolver: &TypeResolver<'_>,
        diags: &mut Diagnostics,
    ) -> Result<RegistryEntry, SchemaError> {
        let fields = flatten_fields(self, resolver.index())?;
        let name = &self.name;

        let mut hdr_buf = CodeBuilder::new();
        let mut src_buf = CodeBuilder::new();

        if let Some(doc) = &self.documentation {
            hdr_buf.write_all(&doc_block(doc));
        }

        hdr_buf.write(&format!("struct {} : detail::StructWrapper {{", name));
        hdr_buf.indent();
        hdr_buf.write("using StructWrapper::StructWrapper;");
        hdr_buf.newline();

        // (type, node expression) of every mandatory aggregate
        let mut mandatory_inner_structs: Vec<(String, String)> = Vec::new();
        // Every member name, nested union types included. The class name and
        // `init` are taken up front.
        let mut members: Vec<String> = vec![name.clone(), "init".to_string()];
        let mut i = 0;
        for prop in fields {
            let owner = format!("{}.{}", name, prop.name);
            if let TypeSpec::StringLiteral { .. } = prop.type_ {
                diags.record(&owner, ConstructKind::StringLiteral);
                continue;
            }

            if let Some(doc) = &prop.documentation {
                if i != 0 {
                    hdr_buf.newline();
                }
                hdr_buf.write_all(&line_comments(doc));
            }

            let kind = resolver.classify(&prop.type_, &owner)?;
            let accessor = escape_cpp_keyword(&prop.name);
            claim(&mut members, name, accessor.clone())?;
            if prop.optional {
                claim(&mut members, name, format!("has_{}", accessor))?;
            }
            if kind.is_settable() {
                claim(&mut members, name, format!("set_{}", accessor))?;
            } else if prop.optional && kind.is_aggregate() {
                claim(&mut members, name, format!("add_{}", accessor))?;
            }

            let inner = match &kind {
                ValueKind::Union(alternatives) => {
                    let union_name = format!("Union{}", i);
                    claim(&mut members, name, union_name.clone())?;
                    generate_union(resolver, diags, &union_name, alternatives, name, &mut hdr_buf, &mut src_buf)?;
                    format!("{}::{}", name, union_name)
                }
                _ => resolver.type_name(&prop.type_, &owner, diags)?,
            };
            let typename = if prop.optional { optional_of(&inner) } else { inner.clone() };

            let key = quote(&prop.name);
            let json_node_object = format!("n_.find_child({})", key);
            let add_child = format!("n_.append_child() << ryml::key({})", key);

            hdr_buf.write(&format!("[[nodiscard]] {} {}();", typename, accessor));
            if prop.optional {
                src_buf.write(&format!(
                    "{} {}::{}() {{ auto c = {}; if (c.invalid()) {{ return std::nullopt; }} return {}; }}",
                    typename,
                    name,
                    accessor,
                    json_node_object,
                    getter(&kind, &inner, "c")
                ));

                hdr_buf.write(&format!("[[nodiscard]] bool has_{}() const;", accessor));
                src_buf.write(&format!(
                    "bool {}::has_{}() const {{ return n_.has_child({}); }}",
                    name, accessor, key
                ));
            } else {
                src_buf.write(&format!(
                    "{} {}::{}() {{ return {}; }}",
                    typename,
                    name,
                    accessor,
                    getter(&kind, &inner, &json_node_object)
                ));
                if kind.is_aggregate() {
                    mandatory_inner_structs.push((inner.clone(), add_child.clone()));
                }
            }

            if kind.is_settable() {
                let setter = if kind == ValueKind::Enumeration {
                    "detail::SerializeEnum(val, c)"
                } else {
                    "detail::SetPrimitive(c, val)"
                };
                hdr_buf.write(&format!("void set_{}({} val);", accessor, inner));
                src_buf.write(&format!(
                    "void {}::set_{}({} val) {{ auto c = {}; if (c.invalid()) {{ c = {}; }} {}; }}",
                    name, accessor, inner, json_node_object, add_child, setter
                ));
            } else if prop.optional && kind.is_aggregate() {
                hdr_buf.write(&format!("[[nodiscard]] {} add_{}();", inner, accessor));
                src_buf.write(&format!(
                    "{} {}::add_{}() {{ auto w = {}({}); w.init(); return w; }}",
                    inner, name, accessor, inner, add_child
                ));
            }

            i += 1;
        }

        hdr_buf.newline();
        hdr_buf.write("void init();");
        hdr_buf.unindent();
        hdr_buf.write("};");
        hdr_buf.newline();

        src_buf.write(&format!("void {}::init() {{", name));
        src_buf.indented(|b| {
            b.write("StructWrapper::init();");
            for (t, add_child) in &mandatory_inner_structs {
                b.write(&format!("{}({}).init();", t, add_child));
            }
        });
        src_buf.write("}");
        src_buf.newline();

        // Flattened fields are covered by the parents' own edges.
        let parents = self.parents().flat_map(referenced_names);
        let own = self.properties.iter().flat_map(|prop| referenced_names(&prop.type_));
        let dependencies: Vec<String> = parents.chain(own).collect();

        tracing::debug!(name = %name, fields = i, dependencies = dependencies.len(), "structure");

        let mut entry = RegistryEntry::new(name, hdr_buf).with_dependencies(dependencies);
        entry.implementation = src_buf;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use lsp_bindgen_schema::{EnumLiteral, EnumValue, Enumeration, Schema};

    fn prop(name: &str, type_: TypeSpec, optional: bool) -> Property {
        Property::new(name, type_, optional)
    }

    fn structure(name: &str, extends: &[&str], properties: Vec<Property>) -> Structure {
        let mut s = Structure::new(name, properties);
        s.extends = extends.iter().map(|p| TypeSpec::reference(p)).collect();
        s
    }

    fn synthesize(schema: &Schema, name: &str) -> Result<(RegistryEntry, Diagnostics), SchemaError> {
        let options = Options::default();
        let resolver = TypeResolver::new(schema, &options);
        let mut diags = Diagnostics::new();
        let s = resolver.index().structure(name).unwrap();
        let entry = s.synthesize(&resolver, &mut diags)?;
        Ok((entry, diags))
    }

    #[test]
    fn flattening_keeps_first_occurrence() {
        let schema = Schema {
            structures: vec![
                structure("P", &[], vec![prop("x", TypeSpec::base("integer"), false)]),
                structure(
                    "Q",
                    &[],
                    vec![prop("x", TypeSpec::base("string"), false), prop("y", TypeSpec::base("string"), false)],
                ),
                structure("S", &["P", "Q"], vec![prop("y", TypeSpec::base("boolean"), true)]),
            ],
            ..Default::default()
        };
        let index = schema.index();
        let fields = flatten_fields(index.structure("S").unwrap(), &index).unwrap();

        let summary: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.type_.clone(), f.optional)).collect();
        assert_eq!(
            summary,
            [
                ("y", TypeSpec::base("boolean"), true),
                ("x", TypeSpec::base("integer"), false),
            ]
        );

        let (entry, _) = synthesize(&schema, "S").unwrap();
        let hdr = entry.header.as_str();
        assert_eq!(hdr.matches("x();").count(), 1);
        assert_eq!(hdr.matches(" y();").count(), 1);
        assert!(hdr.contains("[[nodiscard]] std::int32_t x();"));
        assert_eq!(entry.dependencies, ["P", "Q"]);
    }

    #[test]
    fn flattening_reports_inheritance_cycles() {
        let schema = Schema {
            structures: vec![
                structure("S", &["A"], vec![]),
                structure("A", &["B"], vec![]),
                structure("B", &["A"], vec![]),
            ],
            ..Default::default()
        };
        let index = schema.index();
        assert_eq!(
            flatten_fields(index.structure("S").unwrap(), &index),
            Err(SchemaError::InheritanceCycle(vec!["A".into(), "B".into(), "A".into()]))
        );
    }

    #[test]
    fn grandparent_fields_are_inherited() {
        let schema = Schema {
            structures: vec![
                structure("WorkDoneProgressParams", &[], vec![prop("workDoneToken", TypeSpec::base("string"), true)]),
                structure("TextDocumentPositionParams", &["WorkDoneProgressParams"], vec![]),
                structure("HoverParams", &["TextDocumentPositionParams"], vec![]),
            ],
            ..Default::default()
        };
        let (entry, _) = synthesize(&schema, "HoverParams").unwrap();
        assert!(entry.header.as_str().contains("bool has_workDoneToken() const;"));
        assert_eq!(entry.dependencies, ["TextDocumentPositionParams"]);
    }

    #[test]
    fn accessor_surface() {
        let schema = Schema {
            structures: vec![
                structure("Range", &[], vec![]),
                structure(
                    "Diagnostic",
                    &[],
                    vec![
                        prop("range", TypeSpec::reference("Range"), false),
                        prop("severity", TypeSpec::reference("DiagnosticSeverity"), true),
                        prop("message", TypeSpec::base("string"), false),
                        prop("relatedRange", TypeSpec::reference("Range"), true),
                        prop("tags", TypeSpec::array(TypeSpec::reference("DiagnosticSeverity")), true),
                    ],
                ),
            ],
            enumerations: vec![Enumeration {
                name: "DiagnosticSeverity".to_owned(),
                type_: None,
                values: vec![EnumValue {
                    name: "Error".to_owned(),
                    value: EnumLiteral::Integer(1),
                    documentation: None,
                }],
                supports_custom_values: false,
                documentation: None,
            }],
            ..Default::default()
        };
        let (entry, diags) = synthesize(&schema, "Diagnostic").unwrap();
        assert!(diags.is_empty());

        assert_eq!(
            entry.header.as_str(),
            "struct Diagnostic : detail::StructWrapper {\n\
             \x20 using StructWrapper::StructWrapper;\n\
             \n\
             \x20 [[nodiscard]] Range range();\n\
             \x20 [[nodiscard]] std::optional<DiagnosticSeverity> severity();\n\
             \x20 [[nodiscard]] bool has_severity() const;\n\
             \x20 void set_severity(DiagnosticSeverity val);\n\
             \x20 [[nodiscard]] std::string_view message();\n\
             \x20 void set_message(std::string_view val);\n\
             \x20 [[nodiscard]] std::optional<Range> relatedRange();\n\
             \x20 [[nodiscard]] bool has_relatedRange() const;\n\
             \x20 [[nodiscard]] Range add_relatedRange();\n\
             \x20 [[nodiscard]] std::optional<std::vector<DiagnosticSeverity>> tags();\n\
             \x20 [[nodiscard]] bool has_tags() const;\n\
             \x20 [[nodiscard]] std::vector<DiagnosticSeverity> add_tags();\n\
             \n\
             \x20 void init();\n\
             };\n\
             \n"
        );

        let src = entry.implementation.as_str();
        assert!(src.contains(
            "Range Diagnostic::range() { return Range(n_.find_child(\"range\")); }"
        ));
        assert!(src.contains(
            "std::optional<DiagnosticSeverity> Diagnostic::severity() { auto c = n_.find_child(\"severity\"); \
             if (c.invalid()) { return std::nullopt; } return detail::DeserializeEnum<DiagnosticSeverity>(c); }"
        ));
        assert!(src.contains("detail::SerializeEnum(val, c);"));
        assert!(src.contains(
            "void Diagnostic::set_message(std::string_view val) { auto c = n_.find_child(\"message\"); \
             if (c.invalid()) { c = n_.append_child() << ryml::key(\"message\"); } detail::SetPrimitive(c, val); }"
        ));
        assert!(src.contains(
            "Range Diagnostic::add_relatedRange() { auto w = Range(n_.append_child() << ryml::key(\"relatedRange\")); \
             w.init(); return w; }"
        ));
        assert!(src.ends_with(
            "void Diagnostic::init() {\n  StructWrapper::init();\n  Range(n_.append_child() << ryml::key(\"range\")).init();\n}\n\n"
        ));
        assert_eq!(entry.dependencies, ["Range", "DiagnosticSeverity"]);
    }

    #[test]
    fn union_fields_are_named_by_position() {
        let schema = Schema {
            structures: vec![structure(
                "Hover",
                &[],
                vec![
                    prop("kind", TypeSpec::StringLiteral { value: "hover".to_owned() }, false),
                    prop("range", TypeSpec::base("string"), true),
                    prop(
                        "contents",
                        TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::base("integer"), TypeSpec::null()]),
                        true,
                    ),
                    prop(
                        "label",
                        TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::base("boolean")]),
                        false,
                    ),
                ],
            )],
            ..Default::default()
        };
        let (entry, diags) = synthesize(&schema, "Hover").unwrap();
        let hdr = entry.header.as_str();

        assert!(!hdr.contains("kind()"));
        assert!(hdr.contains("  struct Union1 : detail::UnionStructWrapper<std::string_view, std::int32_t> {\n"));
        assert!(hdr.contains("[[nodiscard]] std::optional<Hover::Union1> contents();"));
        assert!(hdr.contains("[[nodiscard]] Hover::Union1 add_contents();"));
        assert!(hdr.contains("  struct Union2 : detail::UnionStructWrapper<std::string_view, bool> {\n"));
        assert!(hdr.contains("[[nodiscard]] Hover::Union2 label();"));
        assert!(!hdr.contains("set_label"));

        let src = entry.implementation.as_str();
        assert!(src.contains("bool Hover::Union1::holds_integer() const"));
        assert!(src.contains("  Hover::Union2(n_.append_child() << ryml::key(\"label\")).init();\n"));

        assert_eq!(diags.gaps().len(), 1);
        assert_eq!(diags.gaps()[0].owner, "Hover.kind");
        assert_eq!(diags.gaps()[0].kind, ConstructKind::StringLiteral);
    }

    #[test]
    fn optional_single_alternative_is_plain_optional() {
        let schema = Schema {
            structures: vec![structure(
                "S",
                &[],
                vec![prop("name", TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::null()]), true)],
            )],
            ..Default::default()
        };
        let (entry, _) = synthesize(&schema, "S").unwrap();
        let hdr = entry.header.as_str();
        assert!(hdr.contains("[[nodiscard]] std::optional<std::string_view> name();"));
        assert!(hdr.contains("void set_name(std::string_view val);"));
        assert!(!hdr.contains("Union"));
    }

    #[test]
    fn colliding_members_are_rejected() {
        let schema = Schema {
            structures: vec![
                structure("B", &[], vec![]),
                structure("Reset", &[], vec![prop("init", TypeSpec::reference("B"), false)]),
                structure(
                    "Watch",
                    &[],
                    vec![prop("x", TypeSpec::base("string"), true), prop("has_x", TypeSpec::base("boolean"), false)],
                ),
                structure(
                    "Named",
                    &[],
                    vec![
                        prop("pick", TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::base("boolean")]), false),
                        prop("Union0", TypeSpec::base("string"), false),
                    ],
                ),
            ],
            ..Default::default()
        };

        let collision = |owner: &str, name: &str| SchemaError::NameCollision {
            owner: owner.to_owned(),
            name:  name.to_owned(),
        };
        assert_eq!(synthesize(&schema, "Reset").err(), Some(collision("Reset", "init")));
        assert_eq!(synthesize(&schema, "Watch").err(), Some(collision("Watch", "has_x")));
        assert_eq!(synthesize(&schema, "Named").err(), Some(collision("Named", "Union0")));
        assert!(synthesize(&schema, "B").is_ok());
    }

    #[test]
    fn keyword_fields_are_escaped() {
        let schema = Schema {
            structures: vec![structure("Ops", &[], vec![prop("delete", TypeSpec::base("boolean"), true)])],
            ..Default::default()
        };
        let (entry, _) = synthesize(&schema, "Ops").unwrap();
        assert!(entry.header.as_str().contains("std::optional<bool> delete_();"));
        assert!(entry.implementation.as_str().contains("n_.has_child(\"delete\")"));
    }
}
