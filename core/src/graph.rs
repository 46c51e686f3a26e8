//! Relation graph traversal: recursive discovery and dependency ordering.

use std::collections::{HashMap, HashSet};

use crate::relation::Relation;

/// Flattens a relation tree into a single list, following nested schemas.
///
/// Each nested relation's `through` is overwritten with its immediate parent's
/// alias, so the flat list preserves the full ancestry as a chain of pointers.
/// Traversal is depth-first in declaration order. An edge-level visited set
/// guards against cyclic schema definitions: an `a -> b -> a` cycle yields the
/// finite list `[a, b (through a), a (through b)]` because each parent/child
/// edge is walked at most once.
pub fn build_relations_recursive(relations: &[Relation]) -> Vec<Relation> {
    let mut out = Vec::new();
    let mut visited = HashSet::new();
    collect(relations, "", &mut visited, &mut out);
    crate::crud_trace_plan!("discover", out.len());
    out
}

fn collect(
    relations: &[Relation],
    parent: &str,
    visited: &mut HashSet<(String, String)>,
    out: &mut Vec<Relation>,
) {
    for rel in relations {
        if !visited.insert((parent.to_string(), rel.alias.clone())) {
            continue;
        }

        let mut rel = rel.clone();
        if !parent.is_empty() {
            rel.through = parent.to_string();
        }
        let alias = rel.alias.clone();
        let nested = rel.schema.clone();
        out.push(rel);

        if let Some(schema) = nested
            && let Some(children) = schema.relations()
        {
            collect(children, &alias, visited, out);
        }
    }
}

/// Orders relations so every relation appears after the one it joins through.
///
/// Dependencies come solely from `through`: a relation whose `through` names
/// another relation's alias depends on it. Relations with an empty or
/// unresolvable `through` are roots. Independent relations keep their input
/// order, and every input element is emitted exactly once, including
/// duplicates of an alias.
pub fn topological_sort_relations(relations: &[Relation]) -> Vec<Relation> {
    if relations.len() <= 1 {
        return relations.to_vec();
    }

    // First occurrence wins for alias lookup, matching join resolution.
    let mut by_alias: HashMap<&str, usize> = HashMap::with_capacity(relations.len());
    for (i, rel) in relations.iter().enumerate() {
        by_alias.entry(rel.alias.as_str()).or_insert(i);
    }

    let mut emitted = vec![false; relations.len()];
    let mut out = Vec::with_capacity(relations.len());

    for i in 0..relations.len() {
        visit(i, relations, &by_alias, &mut emitted, &mut out);
    }

    crate::crud_trace_plan!("toposort", out.len());
    out
}

fn visit(
    i: usize,
    relations: &[Relation],
    by_alias: &HashMap<&str, usize>,
    emitted: &mut [bool],
    out: &mut Vec<Relation>,
) {
    if emitted[i] {
        return;
    }
    emitted[i] = true;

    let through = relations[i].through.as_str();
    if !through.is_empty()
        && let Some(&dep) = by_alias.get(through)
        && dep != i
    {
        visit(dep, relations, by_alias, emitted, out);
    }

    out.push(relations[i].clone());
}
