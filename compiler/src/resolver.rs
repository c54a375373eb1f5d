//! Maps meta-model type expressions to C++ type expressions, and to the set
//! of named types they reference.

use lsp_bindgen_schema::{live_items, Entity, Schema, SchemaIndex, TypeSpec};

use crate::{
    diagnostics::{ConstructKind, Diagnostics},
    error::SchemaError,
    options::Options,
};

pub const LITERAL_STUB: &str = "LiteralStub";

/// A resolved type expression together with the named types it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub expr: String,
    pub deps: Vec<String>,
}

/// How a resolved type is stored and accessed by the generated wrappers.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Scalar read and written in place.
    Primitive,
    /// Generated enumeration, (de)serialized through the enum glue.
    Enumeration,
    /// Two or more live alternatives, in declaration order.
    Union(Vec<TypeSpec>),
    /// Structure, array, map, tuple or externally defined type.
    Aggregate,
    /// Stand-in for an inline literal type.
    Placeholder,
}

impl ValueKind {
    /// True for kinds with their own wrapper storage, which must be
    /// initialized before use.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, ValueKind::Union(_) | ValueKind::Aggregate)
    }

    pub fn is_settable(&self) -> bool {
        matches!(self, ValueKind::Primitive | ValueKind::Enumeration)
    }
}

/// Maps a base type name to its primitive C++ type.
pub fn base_type(name: &str, owner: &str) -> Result<&'static str, SchemaError> {
    match name {
        "string" | "RegExp" | "DocumentUri" | "URI" => Ok("std::string_view"),
        "decimal"  => Ok("double"),
        "integer"  => Ok("std::int32_t"),
        "uinteger" => Ok("std::uint32_t"),
        "boolean"  => Ok("bool"),
        _ => Err(SchemaError::UnknownBaseType {
            name:  name.to_string(),
            owner: owner.to_string(),
        }),
    }
}

pub fn optional_of(expr: &str) -> String {
    format!("std::optional<{}>", expr)
}

/// Names of every referenced type in `spec`, in first-occurrence order.
/// Only `reference` nodes contribute.
pub fn referenced_names(spec: &TypeSpec) -> Vec<String> {
    fn collect(spec: &TypeSpec, out: &mut Vec<String>) {
        match spec {
            TypeSpec::Reference { name } => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            TypeSpec::Array { element } => collect(element, out),
            TypeSpec::Map { key, value } => {
                collect(key, out);
                collect(value, out);
            }
            TypeSpec::Or { items } | TypeSpec::Tuple { items } => {
                for item in live_items(items) {
                    collect(item, out);
                }
            }
            TypeSpec::Base { .. } | TypeSpec::Literal { .. } | TypeSpec::StringLiteral { .. } => {}
        }
    }

    let mut out = Vec::new();
    collect(spec, &mut out);
    out
}

pub struct TypeResolver<'a> {
    index:   SchemaIndex<'a>,
    options: &'a Options,
}

impl<'a> TypeResolver<'a> {
    pub fn new(schema: &'a Schema, options: &'a Options) -> Self {
        TypeResolver { index: schema.index(), options }
    }

    pub fn index(&self) -> &SchemaIndex<'a> {
        &self.index
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// Resolves `spec` for a slot of `owner`. Optional slots are wrapped in
    /// `std::optional` whatever the inner kind.
    pub fn resolve(
        &self,
        spec: &TypeSpec,
        optional: bool,
        owner: &str,
        diags: &mut Diagnostics,
    ) -> Result<Resolved, SchemaError> {
        let expr = self.type_name(spec, owner, diags)?;
        Ok(Resolved {
            expr: if optional { optional_of(&expr) } else { expr },
            deps: referenced_names(spec),
        })
    }

    /// The C++ expression of `spec`, without optional wrapping.
    pub fn type_name(
        &self,
        spec: &TypeSpec,
        owner: &str,
        diags: &mut Diagnostics,
    ) -> Result<String, SchemaError> {
        match spec {
            TypeSpec::Base { name } => Ok(base_type(name, owner)?.to_string()),
            TypeSpec::Reference { name } => Ok(name.clone()),
            TypeSpec::Array { element } => {
                Ok(format!("std::vector<{}>", self.type_name(element, owner, diags)?))
            }
            TypeSpec::Map { key, value } => Ok(format!(
                "std::unordered_map<{}, {}>",
                self.type_name(key, owner, diags)?,
                self.type_name(value, owner, diags)?
            )),
            TypeSpec::Or { items } => self.collapse(items, "std::variant", owner, diags),
            TypeSpec::Tuple { items } => self.collapse(items, "std::tuple", owner, diags),
            TypeSpec::Literal { .. } => {
                diags.record(owner, ConstructKind::Literal);
                Ok(LITERAL_STUB.to_string())
            }
            TypeSpec::StringLiteral { .. } => {
                diags.record(owner, ConstructKind::StringLiteral);
                Ok("std::string_view".to_string())
            }
        }
    }

    /// `or`/`tuple` rule: drop `null`, wrap two or more alternatives,
    /// collapse a single one, reject none.
    fn collapse(
        &self,
        items: &[TypeSpec],
        wrapper: &str,
        owner: &str,
        diags: &mut Diagnostics,
    ) -> Result<String, SchemaError> {
        let live = live_items(items);
        match live.as_slice() {
            [] => Err(SchemaError::EmptyUnion(owner.to_string())),
            [single] => self.type_name(single, owner, diags),
            _ => {
                let names = live
                    .iter()
                    .map(|item| self.type_name(item, owner, diags))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}<{}>", wrapper, names.join(", ")))
            }
        }
    }

    /// Classifies `spec` for accessor generation, looking through type
    /// aliases but never through built-ins.
    pub fn classify(&self, spec: &TypeSpec, owner: &str) -> Result<ValueKind, SchemaError> {
        let mut seen = Vec::new();
        self.classify_inner(spec, owner, &mut seen)
    }

    fn classify_inner(
        &self,
        spec: &TypeSpec,
        owner: &str,
        seen: &mut Vec<String>,
    ) -> Result<ValueKind, SchemaError> {
        match spec {
            TypeSpec::Base { name } => {
                base_type(name, owner)?;
                Ok(ValueKind::Primitive)
            }
            TypeSpec::StringLiteral { .. } => Ok(ValueKind::Primitive),
            TypeSpec::Reference { name } => {
                if self.options.is_builtin(name) {
                    return Ok(ValueKind::Aggregate);
                }
                match self.index.lookup(name) {
                    Some(Entity::Enumeration(e)) if self.options.is_pass_through(&e.name) => {
                        Ok(ValueKind::Primitive)
                    }
                    Some(Entity::Enumeration(_)) => Ok(ValueKind::Enumeration),
                    Some(Entity::Alias(alias)) if !seen.contains(name) => {
                        seen.push(name.clone());
                        self.classify_inner(&alias.type_, owner, seen)
                    }
                    Some(Entity::Alias(_)) | Some(Entity::Structure(_)) | None => {
                        Ok(ValueKind::Aggregate)
                    }
                }
            }
            TypeSpec::Array { .. } | TypeSpec::Map { .. } => Ok(ValueKind::Aggregate),
            TypeSpec::Or { items } => match live_items(items).as_slice() {
                [] => Err(SchemaError::EmptyUnion(owner.to_string())),
                [single] => self.classify_inner(single, owner, seen),
                live => Ok(ValueKind::Union(live.iter().map(|item| (*item).clone()).collect())),
            },
            TypeSpec::Tuple { items } => match live_items(items).as_slice() {
                [] => Err(SchemaError::EmptyUnion(owner.to_string())),
                [single] => self.classify_inner(single, owner, seen),
                _ => Ok(ValueKind::Aggregate),
            },
            TypeSpec::Literal { .. } => Ok(ValueKind::Placeholder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_bindgen_schema::{EnumLiteral, EnumValue, Enumeration, LiteralValue, Structure, TypeAlias};

    fn schema() -> Schema {
        let string_enum = |name: &str| Enumeration {
            name: name.to_owned(),
            type_: Some(TypeSpec::base("string")),
            values: vec![EnumValue {
                name: "Plain".to_owned(),
                value: EnumLiteral::String("plain".to_owned()),
                documentation: None,
            }],
            supports_custom_values: false,
            documentation: None,
        };
        let alias = |name: &str, type_: TypeSpec| TypeAlias {
            name: name.to_owned(),
            type_,
            documentation: None,
        };
        Schema {
            structures: vec![Structure::new("Location", vec![])],
            enumerations: vec![string_enum("MarkupKind"), string_enum("LanguageKind")],
            type_aliases: vec![
                alias("Pattern", TypeSpec::base("string")),
                alias(
                    "ProgressToken",
                    TypeSpec::or(vec![TypeSpec::base("integer"), TypeSpec::base("string")]),
                ),
                alias("Loop", TypeSpec::reference("Loop")),
                alias("LSPAny", TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::null()])),
            ],
            ..Default::default()
        }
    }

    fn resolve(spec: &TypeSpec, optional: bool) -> Result<Resolved, SchemaError> {
        let schema = schema();
        let options = Options::default();
        let resolver = TypeResolver::new(&schema, &options);
        resolver.resolve(spec, optional, "Owner.field", &mut Diagnostics::new())
    }

    fn classify(spec: &TypeSpec) -> Result<ValueKind, SchemaError> {
        let schema = schema();
        let options = Options::default();
        TypeResolver::new(&schema, &options).classify(spec, "Owner.field")
    }

    #[test]
    fn base_types() {
        assert_eq!(resolve(&TypeSpec::base("DocumentUri"), false).unwrap().expr, "std::string_view");
        assert_eq!(resolve(&TypeSpec::base("uinteger"), false).unwrap().expr, "std::uint32_t");
        assert_eq!(resolve(&TypeSpec::base("boolean"), true).unwrap().expr, "std::optional<bool>");
        assert_eq!(
            resolve(&TypeSpec::base("float"), false),
            Err(SchemaError::UnknownBaseType {
                name: "float".to_owned(),
                owner: "Owner.field".to_owned(),
            })
        );
    }

    #[test]
    fn containers() {
        let spec = TypeSpec::map(
            TypeSpec::base("DocumentUri"),
            TypeSpec::array(TypeSpec::reference("TextEdit")),
        );
        let resolved = resolve(&spec, false).unwrap();
        assert_eq!(resolved.expr, "std::unordered_map<std::string_view, std::vector<TextEdit>>");
        assert_eq!(resolved.deps, ["TextEdit"]);
    }

    #[test]
    fn union_with_null_is_optional_two_way_variant() {
        let spec = TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::base("integer"), TypeSpec::null()]);
        let resolved = resolve(&spec, true).unwrap();
        assert_eq!(resolved.expr, "std::optional<std::variant<std::string_view, std::int32_t>>");
        assert!(resolved.deps.is_empty());
    }

    #[test]
    fn single_alternative_collapses() {
        let spec = TypeSpec::or(vec![TypeSpec::base("string"), TypeSpec::null()]);
        assert_eq!(resolve(&spec, true).unwrap().expr, "std::optional<std::string_view>");
        assert_eq!(classify(&spec), Ok(ValueKind::Primitive));
    }

    #[test]
    fn no_live_alternative_is_an_error() {
        let spec = TypeSpec::or(vec![TypeSpec::null()]);
        assert_eq!(resolve(&spec, false), Err(SchemaError::EmptyUnion("Owner.field".to_owned())));
        let spec = TypeSpec::tuple(vec![]);
        assert_eq!(classify(&spec), Err(SchemaError::EmptyUnion("Owner.field".to_owned())));
    }

    #[test]
    fn tuples() {
        let spec = TypeSpec::tuple(vec![TypeSpec::base("uinteger"), TypeSpec::base("uinteger")]);
        assert_eq!(resolve(&spec, false).unwrap().expr, "std::tuple<std::uint32_t, std::uint32_t>");
        assert_eq!(classify(&spec), Ok(ValueKind::Aggregate));
    }

    #[test]
    fn single_item_tuple_collapses() {
        let spec = TypeSpec::tuple(vec![TypeSpec::reference("Location"), TypeSpec::null()]);
        let resolved = resolve(&spec, true).unwrap();
        assert_eq!(resolved.expr, "std::optional<Location>");
        assert_eq!(resolved.deps, ["Location"]);
        assert_eq!(classify(&spec), Ok(ValueKind::Aggregate));
    }

    #[test]
    fn dependencies_only_from_references() {
        let spec = TypeSpec::or(vec![
            TypeSpec::reference("Location"),
            TypeSpec::array(TypeSpec::reference("Location")),
            TypeSpec::tuple(vec![TypeSpec::reference("Range"), TypeSpec::base("string")]),
            TypeSpec::Literal { value: LiteralValue::default() },
            TypeSpec::null(),
        ]);
        assert_eq!(referenced_names(&spec), ["Location", "Range"]);
    }

    #[test]
    fn literals_are_recorded() {
        let schema = schema();
        let options = Options::default();
        let resolver = TypeResolver::new(&schema, &options);
        let mut diags = Diagnostics::new();

        let literal = TypeSpec::Literal { value: LiteralValue::default() };
        assert_eq!(resolver.resolve(&literal, false, "S.a", &mut diags).unwrap().expr, LITERAL_STUB);
        let constant = TypeSpec::StringLiteral { value: "create".to_owned() };
        assert_eq!(resolver.type_name(&constant, "S.b", &mut diags).unwrap(), "std::string_view");

        let kinds: Vec<_> = diags.gaps().iter().map(|g| (g.owner.as_str(), g.kind)).collect();
        assert_eq!(kinds, [("S.a", ConstructKind::Literal), ("S.b", ConstructKind::StringLiteral)]);
    }

    #[test]
    fn classification() {
        assert_eq!(classify(&TypeSpec::reference("MarkupKind")), Ok(ValueKind::Enumeration));
        assert_eq!(classify(&TypeSpec::reference("LanguageKind")), Ok(ValueKind::Primitive));
        assert_eq!(classify(&TypeSpec::reference("Location")), Ok(ValueKind::Aggregate));
        assert_eq!(classify(&TypeSpec::reference("Pattern")), Ok(ValueKind::Primitive));
        assert_eq!(classify(&TypeSpec::reference("Undeclared")), Ok(ValueKind::Aggregate));
        assert_eq!(classify(&TypeSpec::reference("LSPAny")), Ok(ValueKind::Aggregate));
        assert_eq!(classify(&TypeSpec::reference("Loop")), Ok(ValueKind::Aggregate));
        assert_eq!(
            classify(&TypeSpec::reference("ProgressToken")),
            Ok(ValueKind::Union(vec![TypeSpec::base("integer"), TypeSpec::base("string")]))
        );
        assert_eq!(
            classify(&TypeSpec::Literal { value: LiteralValue::default() }),
            Ok(ValueKind::Placeholder)
        );
    }
}
