//! Emission order of registry entries.

use std::collections::BTreeSet;

use crate::{
    builder::{Registry, RegistryEntry},
    error::SchemaError,
};

/// Internal dependency edges of `registry`: for every scheduled entry, the
/// scheduled entries it depends on. External entries and names missing from
/// the registry do not take part in ordering.
fn dependency_edges(registry: &Registry) -> Vec<Vec<usize>> {
    (0..registry.len())
        .map(|index| match registry.entry_at(index) {
            Some(entry) if !entry.external => entry
                .dependencies
                .iter()
                .filter_map(|dep| registry.get_index_of(dep))
                .filter(|&dep| dep != index)
                .filter(|&dep| registry.entry_at(dep).is_some_and(|e| !e.external))
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}

/// Topological order over the scheduled entries of `registry`, dependencies
/// first. Among entries that are ready at the same time, the one inserted
/// first wins, so the order only depends on the registry contents.
pub fn emission_order(registry: &Registry) -> Result<Vec<&RegistryEntry>, SchemaError> {
    let edges = dependency_edges(registry);

    let mut in_degree: Vec<usize> = edges.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); edges.len()];
    for (index, deps) in edges.iter().enumerate() {
        for &dep in deps {
            dependents[dep].push(index);
        }
    }

    let scheduled: Vec<usize> = (0..registry.len())
        .filter(|&index| registry.entry_at(index).is_some_and(|e| !e.external))
        .collect();

    let mut ready: BTreeSet<usize> = scheduled.iter().copied().filter(|&i| in_degree[i] == 0).collect();
    let mut done = vec![false; edges.len()];
    let mut order = Vec::with_capacity(scheduled.len());

    while let Some(index) = ready.pop_first() {
        done[index] = true;
        if let Some(entry) = registry.entry_at(index) {
            order.push(entry);
        }
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < scheduled.len() {
        let cycle = find_cycle(&edges, &done, &scheduled);
        let names = cycle
            .into_iter()
            .filter_map(|index| registry.entry_at(index).map(|e| e.name.clone()))
            .collect();
        return Err(SchemaError::DependencyCycle(names));
    }

    tracing::debug!(entries = order.len(), "emission order");
    Ok(order)
}

/// One concrete cycle among the entries Kahn's algorithm left behind. Every
/// such entry still waits on another leftover entry, so following the first
/// pending dependency must come back to a visited entry. The first entry of
/// the cycle is repeated at the end.
fn find_cycle(edges: &[Vec<usize>], done: &[bool], scheduled: &[usize]) -> Vec<usize> {
    let Some(mut current) = scheduled.iter().copied().find(|&i| !done[i]) else {
        return Vec::new();
    };

    let mut path: Vec<usize> = Vec::new();
    loop {
        if let Some(pos) = path.iter().position(|&i| i == current) {
            let mut cycle = path.split_off(pos);
            cycle.push(current);
            return cycle;
        }
        path.push(current);
        match edges[current].iter().copied().find(|&dep| !done[dep]) {
            Some(next) => current = next,
            None => return path,
        }
    }
}
