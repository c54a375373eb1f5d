use indexmap::IndexMap;

use crate::error::SchemaError;

const TAB_WIDTH: usize = 2;

/// Indentation-aware text buffer for generated source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuilder {
    buf:         String,
    indentation: usize,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    pub fn unindent(&mut self) {
        self.indentation = self.indentation.saturating_sub(1);
    }

    /// Runs `f` one level deeper.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent();
        let out = f(self);
        self.unindent();
        out
    }

    pub fn write(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indentation * TAB_WIDTH {
                self.buf.push(' ');
            }
            self.buf.push_str(line);
        }
        self.buf.push('\n');
    }

    pub fn write_all<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            self.write(line.as_ref());
        }
    }

    pub fn newline(&mut self) {
        self.buf.push('\n');
    }

    /// Appends the text of `other` verbatim.
    pub fn append(&mut self, other: &CodeBuilder) {
        self.buf.push_str(&other.buf);
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn build(self) -> String {
        self.buf
    }
}

/// The synthesized code of one named schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name:           String,
    /// Declarations, emitted inside the namespace in dependency order.
    pub header:         CodeBuilder,
    /// Out-of-line definitions.
    pub implementation: CodeBuilder,
    /// Emitted after the namespace closes (reflection metadata).
    pub appendix:       CodeBuilder,
    /// Names this entry must be emitted after.
    pub dependencies:   Vec<String>,
    /// Defined by hand in the output scaffold; never scheduled nor emitted.
    pub external:       bool,
}

impl RegistryEntry {
    pub fn new(name: &str, header: CodeBuilder) -> Self {
        RegistryEntry {
            name:           name.to_string(),
            header,
            implementation: CodeBuilder::new(),
            appendix:       CodeBuilder::new(),
            dependencies:   Vec::new(),
            external:       false,
        }
    }

    /// Replaces the dependency list, dropping self references and repeats.
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.clear();
        for dep in deps {
            let dep = dep.into();
            if dep != self.name && !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }
}

/// Insertion-ordered map of registry entries. Insertion order breaks ties
/// in the emission order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RegistryEntry) -> Result<(), SchemaError> {
        if self.entries.contains_key(&entry.name) {
            return Err(SchemaError::DuplicateDefinition(entry.name));
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn get_index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub(crate) fn entry_at(&self, index: usize) -> Option<&RegistryEntry> {
        self.entries.get_index(index).map(|(_, entry)| entry)
    }
}
