use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::ModelError, NULL_BASE};

/// A type expression of the meta-model. The `kind` tag is closed: every
/// consumer matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeSpec {
    Base      { name: String },
    Reference { name: String },
    Array     { element: Box<TypeSpec> },
    Map       { key: Box<TypeSpec>, value: Box<TypeSpec> },
    Or        { items: Vec<TypeSpec> },
    Tuple     { items: Vec<TypeSpec> },
    Literal   { value: LiteralValue },
    StringLiteral { value: String },
}

impl TypeSpec {
    pub fn base(name: &str) -> Self {
        TypeSpec::Base { name: name.to_string() }
    }

    pub fn reference(name: &str) -> Self {
        TypeSpec::Reference { name: name.to_string() }
    }

    pub fn array(element: TypeSpec) -> Self {
        TypeSpec::Array { element: Box::new(element) }
    }

    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Map { key: Box::new(key), value: Box::new(value) }
    }

    pub fn or(items: Vec<TypeSpec>) -> Self {
        TypeSpec::Or { items }
    }

    pub fn tuple(items: Vec<TypeSpec>) -> Self {
        TypeSpec::Tuple { items }
    }

    pub fn null() -> Self {
        Self::base(NULL_BASE)
    }

    /// True for the `null` base marker, which only ever means "optional".
    pub fn is_null(&self) -> bool {
        matches!(self, TypeSpec::Base { name } if name == NULL_BASE)
    }

    /// The `kind` tag as it appears in the meta-model.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeSpec::Base { .. }          => "base",
            TypeSpec::Reference { .. }     => "reference",
            TypeSpec::Array { .. }         => "array",
            TypeSpec::Map { .. }           => "map",
            TypeSpec::Or { .. }            => "or",
            TypeSpec::Tuple { .. }         => "tuple",
            TypeSpec::Literal { .. }       => "literal",
            TypeSpec::StringLiteral { .. } => "stringLiteral",
        }
    }
}

/// Drops the `null` markers of an `or`/`tuple` item list, keeping order.
pub fn live_items(items: &[TypeSpec]) -> Vec<&TypeSpec> {
    items.iter().filter(|item| !item.is_null()).collect()
}

/// Inline object type (`{ "kind": "literal" }`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LiteralValue {
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Property {
    pub name:          String,
    #[serde(rename = "type")]
    pub type_:         TypeSpec,
    #[serde(default)]
    pub optional:      bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Property {
    pub fn new(name: &str, type_: TypeSpec, optional: bool) -> Self {
        Property {
            name: name.to_string(),
            type_,
            optional,
            documentation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Structure {
    pub name:          String,
    #[serde(default)]
    pub properties:    Vec<Property>,
    #[serde(default)]
    pub extends:       Vec<TypeSpec>,
    #[serde(default)]
    pub mixins:        Vec<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Structure {
    pub fn new(name: &str, properties: Vec<Property>) -> Self {
        Structure {
            name: name.to_string(),
            properties,
            extends: Vec::new(),
            mixins: Vec::new(),
            documentation: None,
        }
    }

    /// `extends` followed by `mixins`, in declaration order.
    pub fn parents(&self) -> impl Iterator<Item = &TypeSpec> {
        self.extends.iter().chain(self.mixins.iter())
    }
}

/// The literal of one enumeration value. The meta-model mixes JSON numbers
/// and strings here; a well-formed enumeration uses only one of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EnumLiteral {
    Integer(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnumValue {
    pub name:          String,
    pub value:         EnumLiteral,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enumeration {
    pub name:                   String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_:                  Option<TypeSpec>,
    pub values:                 Vec<EnumValue>,
    #[serde(default)]
    pub supports_custom_values: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation:          Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TypeAlias {
    pub name:          String,
    #[serde(rename = "type")]
    pub type_:         TypeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MetaData {
    pub version: String,
}

/// The whole meta-model. Requests and notifications in the source file are
/// not part of the model and are ignored on load.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data:    Option<MetaData>,
    #[serde(default)]
    pub structures:   Vec<Structure>,
    #[serde(default)]
    pub enumerations: Vec<Enumeration>,
    #[serde(default)]
    pub type_aliases: Vec<TypeAlias>,
}

impl Schema {
    pub fn from_json(text: &str) -> Result<Schema, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Schema, ModelError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Builds a name index over every named entity. When a name is defined
    /// more than once the first definition (structures, then enumerations,
    /// then aliases) is the one indexed.
    pub fn index(&self) -> SchemaIndex<'_> {
        let mut entities = HashMap::new();
        for s in &self.structures {
            entities.entry(s.name.as_str()).or_insert(Entity::Structure(s));
        }
        for e in &self.enumerations {
            entities.entry(e.name.as_str()).or_insert(Entity::Enumeration(e));
        }
        for a in &self.type_aliases {
            entities.entry(a.name.as_str()).or_insert(Entity::Alias(a));
        }
        SchemaIndex { entities }
    }
}

/// A named entity of the shared structure/enumeration/alias namespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity<'a> {
    Structure(&'a Structure),
    Enumeration(&'a Enumeration),
    Alias(&'a TypeAlias),
}

impl<'a> Entity<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Entity::Structure(s)   => &s.name,
            Entity::Enumeration(e) => &e.name,
            Entity::Alias(a)       => &a.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaIndex<'a> {
    entities: HashMap<&'a str, Entity<'a>>,
}

impl<'a> SchemaIndex<'a> {
    pub fn lookup(&self, name: &str) -> Option<Entity<'a>> {
        self.entities.get(name).copied()
    }

    pub fn structure(&self, name: &str) -> Option<&'a Structure> {
        match self.lookup(name) {
            Some(Entity::Structure(s)) => Some(s),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<&'a Enumeration> {
        match self.lookup(name) {
            Some(Entity::Enumeration(e)) => Some(e),
            _ => None,
        }
    }

    pub fn alias(&self, name: &str) -> Option<&'a TypeAlias> {
        match self.lookup(name) {
            Some(Entity::Alias(a)) => Some(a),
            _ => None,
        }
    }
}
