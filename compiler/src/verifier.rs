use std::collections::HashMap;

use lsp_bindgen_schema::{Schema, SchemaIndex, Structure, TypeSpec};

use crate::error::SchemaError;

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

/// Returns `Ok(())` if verification passed, or the first `SchemaError` found.
pub fn verify_schema(schema: &Schema) -> Result<(), SchemaError> {
    // 1) Names are unique across structures, enumerations and aliases
    let mut defined: Vec<&str> = Vec::new();
    let names = schema
        .structures
        .iter()
        .map(|s| s.name.as_str())
        .chain(schema.enumerations.iter().map(|e| e.name.as_str()))
        .chain(schema.type_aliases.iter().map(|a| a.name.as_str()));
    for name in names {
        if defined.contains(&name) {
            return Err(SchemaError::DuplicateDefinition(name.to_string()));
        }
        defined.push(name);
    }

    // 2) Every parent is a reference to a structure
    let index = schema.index();
    for structure in &schema.structures {
        for parent in structure.parents() {
            parent_structure(structure, parent, &index)?;
        }
    }

    // 3) No structure inherits from itself
    fn check_recursion<'a>(
        structure: &'a Structure,
        index: &SchemaIndex<'a>,
        state: &mut HashMap<&'a str, Visit>,
        path: &mut Vec<&'a str>,
    ) -> Result<(), SchemaError> {
        match state.get(structure.name.as_str()) {
            Some(Visit::InProgress) => {
                return Err(SchemaError::InheritanceCycle(cycle_from(path, &structure.name)));
            }
            Some(Visit::Done) => return Ok(()),
            None => {}
        }
        state.insert(&structure.name, Visit::InProgress);
        path.push(&structure.name);
        for parent in structure.parents() {
            let parent = parent_structure(structure, parent, index)?;
            check_recursion(parent, index, state, path)?;
        }
        path.pop();
        state.insert(&structure.name, Visit::Done);
        Ok(())
    }

    let mut state = HashMap::new();
    for structure in &schema.structures {
        check_recursion(structure, &index, &mut state, &mut Vec::new())?;
    }

    Ok(())
}

/// The tail of the inheritance walk `path` starting at `name`, closed by
/// `name` again: `A -> B -> A`.
pub(crate) fn cycle_from(path: &[&str], name: &str) -> Vec<String> {
    let start = path.iter().position(|n| *n == name).unwrap_or(0);
    path[start..]
        .iter()
        .chain(std::iter::once(&name))
        .map(|n| n.to_string())
        .collect()
}

/// Resolves one `extends`/`mixins` entry of `structure`.
pub(crate) fn parent_structure<'a>(
    structure: &Structure,
    parent: &TypeSpec,
    index: &SchemaIndex<'a>,
) -> Result<&'a Structure, SchemaError> {
    let unknown = |parent: String| SchemaError::UnknownParent {
        structure: structure.name.clone(),
        parent,
    };
    match parent {
        TypeSpec::Reference { name } => index.structure(name).ok_or_else(|| unknown(name.clone())),
        other => Err(unknown(other.kind_name().to_string())),
    }
}
