use lsp_bindgen_schema::ModelError;
use thiserror::Error;

use crate::utils::quote;

/// Fatal problems in the schema itself. Every variant names the entity at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Unknown base type {} in {}", quote(.name), quote(.owner))]
    UnknownBaseType {
        name:  String,
        owner: String,
    },

    #[error("Union with no live alternative in {}", quote(.0))]
    EmptyUnion(String),

    #[error("Enumeration {} mixes integer and string values", quote(.0))]
    MixedEnum(String),

    #[error("Value {value} of enumeration {} does not fit in 32 bits", quote(.name))]
    EnumValueOutOfRange {
        name:  String,
        value: i64,
    },

    #[error("Name {} is generated twice in {}", quote(.name), quote(.owner))]
    NameCollision {
        owner: String,
        name:  String,
    },

    #[error("Name {} in {} is not a valid identifier", quote(.name), quote(.owner))]
    InvalidIdentifier {
        owner: String,
        name:  String,
    },

    #[error("The type {} is defined twice", quote(.0))]
    DuplicateDefinition(String),

    #[error("Structure {} inherits from {}, which is not a structure", quote(.structure), quote(.parent))]
    UnknownParent {
        structure: String,
        parent:    String,
    },

    #[error("Recursive inheritance between {}", .0.iter().map(|n| quote(n)).collect::<Vec<_>>().join(" -> "))]
    InheritanceCycle(Vec<String>),

    #[error("Dependency cycle between {}", .0.iter().map(|n| quote(n)).collect::<Vec<_>>().join(" -> "))]
    DependencyCycle(Vec<String>),
}

#[derive(Debug, Error)]
pub enum BindgenError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Options error: {0}")]
    Config(#[from] serde_json::Error),
}
