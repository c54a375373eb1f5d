//! This is a Rust library with the in-memory model of the Language Server
//! Protocol meta-model (`metaModel.json`): structures, enumerations and type
//! aliases, and the type algebra that connects them.
//!
//! ```
//! use lsp_bindgen_schema::*;
//!
//! let schema = Schema::from_json(r#"{
//!     "structures": [{
//!         "name": "Position",
//!         "properties": [
//!             { "name": "line", "type": { "kind": "base", "name": "uinteger" } },
//!             { "name": "character", "type": { "kind": "base", "name": "uinteger" } }
//!         ]
//!     }],
//!     "enumerations": [],
//!     "typeAliases": []
//! }"#).unwrap();
//!
//! let index = schema.index();
//! assert!(matches!(index.lookup("Position"), Some(Entity::Structure(_))));
//! assert_eq!(schema.structures[0].properties[1].type_, TypeSpec::base("uinteger"));
//! ```

pub mod error;
pub mod model;

pub use error::*;
pub use model::*;

/// Base type name that marks an optional slot inside `or`/`tuple` items.
pub const NULL_BASE: &str = "null";
