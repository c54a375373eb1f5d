//! Known gaps of the generator. Unsupported constructs still produce code
//! (a placeholder or a stub), and each one is recorded here so callers can
//! report it.

use std::fmt;

use serde::Serialize;

use crate::utils::quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstructKind {
    /// Inline object type, emitted as `LiteralStub`.
    Literal,
    /// String constant, emitted as a plain string view (or skipped as a property).
    StringLiteral,
    /// Map alternative of a union: declared, but the accessor body is a stub.
    MapInUnion,
    /// Tuple alternative of a union: no accessors are emitted.
    TupleInUnion,
    /// Literal alternative of a union: no accessors are emitted.
    LiteralInUnion,
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConstructKind::Literal        => "literal type",
            ConstructKind::StringLiteral  => "string literal type",
            ConstructKind::MapInUnion     => "map alternative in union",
            ConstructKind::TupleInUnion   => "tuple alternative in union",
            ConstructKind::LiteralInUnion => "literal alternative in union",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedConstruct {
    /// Qualified name of the entity (and member) the construct appears in.
    pub owner: String,
    pub kind:  ConstructKind,
}

impl fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.kind, quote(&self.owner))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    gaps: Vec<UnsupportedConstruct>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, owner: &str, kind: ConstructKind) {
        let gap = UnsupportedConstruct { owner: owner.to_string(), kind };
        tracing::debug!(%gap, "unsupported construct");
        self.gaps.push(gap);
    }

    pub fn gaps(&self) -> &[UnsupportedConstruct] {
        &self.gaps
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn into_gaps(self) -> Vec<UnsupportedConstruct> {
        self.gaps
    }
}
