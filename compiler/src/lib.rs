//! lsp-bindgen-compiler
//!
//! This crate implements:
//!  1) A schema verifier (duplicate names, unknown parents, recursive inheritance),
//!  2) The type resolver mapping meta-model types to C++ type expressions,
//!  3) Enumeration, type alias, structure and union synthesis into registry entries,
//!  4) Dependency ordering of the registry (`emission_order`),
//!  5) Artifact assembly and writing (`compile_schema_to_cpp`, `write_bindings`),
//!  6) Error types (`SchemaError`, `BindgenError`) and generator `Options`.

pub mod error;
pub mod utils;
pub mod options;
pub mod diagnostics;
pub mod builder;
pub mod verifier;
pub mod resolver;
pub mod traits;
pub mod enums;
pub mod aliases;
pub mod unions;
pub mod structs;
pub mod order;
pub mod gen_cpp;

pub use diagnostics::{ConstructKind, Diagnostics, UnsupportedConstruct};
pub use error::{BindgenError, SchemaError};
pub use gen_cpp::{build_registry, compile_schema_to_cpp, emission_names, write_bindings, Bindings};
pub use options::{Builtin, Options};
pub use order::emission_order;
pub use verifier::verify_schema;
