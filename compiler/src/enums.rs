//! Enumerations: an `enum class` declaration, `SerializeEnum`/`DeserializeEnum`
//! glue, and for string-backed enumerations a name lookup table.

use lsp_bindgen_schema::{EnumLiteral, Enumeration};

use crate::{
    builder::{CodeBuilder, RegistryEntry},
    diagnostics::Diagnostics,
    error::SchemaError,
    resolver::TypeResolver,
    traits::Synthesize,
    utils::{as_enum_constant, doc_block, is_identifier, line_comments, quote},
};

/// How the values of an enumeration are represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Integer { underlying: &'static str },
    /// Values are numbered by declaration order.
    String { underlying: &'static str },
}

impl Representation {
    /// The `enum class` base type.
    pub fn underlying(&self) -> &'static str {
        match self {
            Representation::Integer { underlying } | Representation::String { underlying } => underlying,
        }
    }
}

/// Classifies the values of `enumeration`. Integer enumerations get the
/// narrowest fitting type: `std::uint8_t`, then `std::uint32_t`, and
/// `std::int32_t` as soon as one value is negative. String enumerations
/// number their values, so their width follows the value count.
pub fn representation(enumeration: &Enumeration) -> Result<Representation, SchemaError> {
    let mut integers = Vec::new();
    let mut strings = 0;
    for value in &enumeration.values {
        match value.value {
            EnumLiteral::Integer(v) => integers.push(v),
            EnumLiteral::String(_) => strings += 1,
        }
    }

    if strings > 0 {
        return if integers.is_empty() {
            let underlying = if strings <= 256 { "std::uint8_t" } else { "std::uint32_t" };
            Ok(Representation::String { underlying })
        } else {
            Err(SchemaError::MixedEnum(enumeration.name.clone()))
        };
    }

    let out_of_range = |value: i64| SchemaError::EnumValueOutOfRange {
        name: enumeration.name.clone(),
        value,
    };
    let min = integers.iter().copied().min().unwrap_or(0);
    let max = integers.iter().copied().max().unwrap_or(0);

    let underlying = if min < 0 {
        if min < i64::from(i32::MIN) {
            return Err(out_of_range(min));
        }
        if max > i64::from(i32::MAX) {
            return Err(out_of_range(max));
        }
        "std::int32_t"
    } else if max <= i64::from(u8::MAX) {
        "std::uint8_t"
    } else if max <= i64::from(u32::MAX) {
        "std::uint32_t"
    } else {
        return Err(out_of_range(max));
    };

    Ok(Representation::Integer { underlying })
}

/// Constant names of every value, in declaration order. They must be valid
/// and distinct identifiers.
pub fn constant_names(enumeration: &Enumeration) -> Result<Vec<String>, SchemaError> {
    let mut names: Vec<String> = Vec::with_capacity(enumeration.values.len());
    for value in &enumeration.values {
        let name = as_enum_constant(&value.name);
        if !is_identifier(&name) {
            return Err(SchemaError::InvalidIdentifier {
                owner: enumeration.name.clone(),
                name,
            });
        }
        if names.contains(&name) {
            return Err(SchemaError::NameCollision {
                owner: enumeration.name.clone(),
                name,
            });
        }
        names.push(name);
    }
    Ok(names)
}

fn wire_literal(value: &EnumLiteral) -> String {
    match value {
        EnumLiteral::Integer(v) => v.to_string(),
        EnumLiteral::String(s) => quote(s),
    }
}

impl Synthesize for Enumeration {
    fn synthesize(
        &self,
        resolver: &TypeResolver<'_>,
        _diags: &mut Diagnostics,
    ) -> Result<RegistryEntry, SchemaError> {
        let mut hdr_buf = CodeBuilder::new();
        if let Some(doc) = &self.documentation {
            hdr_buf.write_all(&doc_block(doc));
        }

        let options = resolver.options();
        if options.is_pass_through(&self.name) {
            hdr_buf.write(&format!("using {} = std::string_view;", self.name));
            hdr_buf.newline();
            return Ok(RegistryEntry::new(&self.name, hdr_buf));
        }

        let repr = representation(self)?;
        let constants = constant_names(self)?;

        hdr_buf.write(&format!("enum class {} : {} {{", self.name, repr.underlying()));
        hdr_buf.indented(|b| {
            for (i, (item, constant)) in self.values.iter().zip(&constants).enumerate() {
                if let Some(doc) = &item.documentation {
                    if i != 0 {
                        b.newline();
                    }
                    b.write_all(&line_comments(doc));
                }
                match (&item.value, repr) {
                    (EnumLiteral::Integer(v), Representation::Integer { .. }) => {
                        b.write(&format!("{} = {},", constant, v));
                    }
                    _ => b.write(&format!("{},", constant)),
                }
            }
        });
        hdr_buf.write("};");
        hdr_buf.newline();

        let mut entry = RegistryEntry::new(&self.name, hdr_buf);
        entry.implementation = serialization(self, repr, &constants);
        if matches!(repr, Representation::String { .. }) {
            entry.appendix = lookup_table(self, &options.namespace, &constants);
        }

        tracing::debug!(name = %self.name, underlying = repr.underlying(), "enumeration");
        Ok(entry)
    }
}

fn serialization(enumeration: &Enumeration, repr: Representation, constants: &[String]) -> CodeBuilder {
    let name = &enumeration.name;
    let mut buf = CodeBuilder::new();

    match repr {
        Representation::Integer { underlying } => {
            // Wire integers are read back through a 32-bit primitive.
            let wire = if underlying == "std::uint32_t" { "std::uint32_t" } else { "std::int32_t" };
            buf.write("template <>");
            buf.write(&format!("void detail::SerializeEnum({} val, ryml::NodeRef n) {{", name));
            buf.indented(|b| b.write(&format!("detail::SetPrimitive(n, static_cast<{}>(val));", wire)));
            buf.write("}");
            buf.newline();

            buf.write("template <>");
            buf.write(&format!("{} detail::DeserializeEnum(ryml::ConstNodeRef n) {{", name));
            buf.indented(|b| {
                b.write(&format!("return static_cast<{}>(detail::NodeAsPrimitive<{}>(n));", name, wire))
            });
            buf.write("}");
            buf.newline();
        }
        Representation::String { .. } => {
            buf.write("template <>");
            buf.write(&format!("void detail::SerializeEnum({} val, ryml::NodeRef n) {{", name));
            buf.indented(|b| {
                b.write("switch (val) {");
                b.indented(|b| {
                    for (item, constant) in enumeration.values.iter().zip(constants) {
                        b.write(&format!(
                            "case {}::{}: n = {}; break;",
                            name,
                            constant,
                            wire_literal(&item.value)
                        ));
                    }
                });
                b.write("}");
            });
            buf.write("}");
            buf.newline();

            buf.write("template <>");
            buf.write(&format!("{} detail::DeserializeEnum(ryml::ConstNodeRef n) {{", name));
            buf.indented(|b| {
                b.write("const auto tv = n.val();");
                for (item, constant) in enumeration.values.iter().zip(constants) {
                    b.write(&format!(
                        "if ({} == tv) {{ return {}::{}; }}",
                        wire_literal(&item.value),
                        name,
                        constant
                    ));
                }
                b.write("assert(false);");
                b.write("return {};");
            });
            buf.write("}");
            buf.newline();
        }
    }

    buf
}

/// `glz::meta` table pairing every constant with its canonical string.
fn lookup_table(enumeration: &Enumeration, namespace: &str, constants: &[String]) -> CodeBuilder {
    let qualified = format!("{}::{}", namespace, enumeration.name);
    let pairs: Vec<String> = enumeration
        .values
        .iter()
        .zip(constants)
        .map(|(item, constant)| format!("{}, {}", wire_literal(&item.value), constant))
        .collect();

    let mut buf = CodeBuilder::new();
    buf.write("template <>");
    buf.write(&format!("struct glz::meta<{}> {{", qualified));
    buf.indented(|b| {
        b.write(&format!("using enum {};", qualified));
        b.write(&format!("static constexpr auto value = enumerate({});", pairs.join(", ")));
    });
    buf.write("};");
    buf
}
