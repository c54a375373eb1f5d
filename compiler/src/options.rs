use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BindgenError;

/// A name the output scaffold defines by hand. Schema entries with this name
/// are never scheduled or emitted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Builtin {
    pub name:       String,
    pub definition: String,
}

impl Builtin {
    pub fn new(name: &str, definition: &str) -> Self {
        Builtin { name: name.to_string(), definition: definition.to_string() }
    }
}

/// Generator options. Every field has a default, so an options file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// C++ namespace wrapping every generated declaration.
    pub namespace:          String,
    /// Header path, relative to the output directory.
    pub header_path:        PathBuf,
    /// Implementation path, relative to the output directory. `None` emits
    /// the definitions into the header after the declarations.
    pub source_path:        Option<PathBuf>,
    /// System includes of the header, in order.
    pub includes:           Vec<String>,
    /// Hand-written runtime support header.
    pub base_header:        String,
    /// String enumerations emitted as a bare string alias.
    pub pass_through_enums: Vec<String>,
    pub builtins:           Vec<Builtin>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            namespace:          "lsp".to_string(),
            header_path:        PathBuf::from("include/LSProtocol.h"),
            source_path:        Some(PathBuf::from("src/LSProtocol.cpp")),
            includes: [
                "cstdint",
                "glaze/glaze.hpp",
                "map",
                "optional",
                "string_view",
                "tuple",
                "unordered_map",
                "variant",
                "vector",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            base_header:        "LSProtocolBase.h".to_string(),
            pass_through_enums: vec!["LanguageKind".to_string()],
            builtins: vec![
                Builtin::new("LSPAny", "glz::json_t"),
                Builtin::new("LSPArray", "std::vector<LSPAny>"),
                Builtin::new("LSPObject", "std::map<std::string_view, LSPAny>"),
            ],
        }
    }
}

impl Options {
    pub fn from_json(text: &str) -> Result<Options, BindgenError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Options, BindgenError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.iter().any(|b| b.name == name)
    }

    pub fn is_pass_through(&self, name: &str) -> bool {
        self.pass_through_enums.iter().any(|n| n == name)
    }
}
