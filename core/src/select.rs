//! SELECT column synthesis for relation graphs.
//!
//! `BelongsTo` relations produce flat prefixed columns (`vt.name AS vt__name`,
//! nested as `vg.name AS vt__vg__name`). `HasMany` relations produce a
//! correlated subquery aggregating child rows into a JSON array, aliased
//! `<alias>__json`, so a single row per parent comes back regardless of
//! child cardinality.

use std::collections::HashSet;

use crate::relation::{Relation, RelationKind};
use crate::schema::Schema;

/// Full ancestor-chain column prefix for a relation, e.g. `p__d__dr` for a
/// relation `dr` through `d` through `p`.
///
/// Resolution walks `through` pointers across the whole flat list, not just
/// one hop. A `through` naming no relation in the list becomes a literal head
/// segment; a cycle stops the walk at the first repeated alias.
pub fn scoped_prefix(relation: &Relation, all: &[Relation]) -> String {
    let mut segments = vec![relation.alias.as_str()];
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(relation.alias.as_str());

    let mut current = relation.through.as_str();
    while !current.is_empty() {
        if !seen.insert(current) {
            break;
        }
        segments.push(current);
        match all.iter().find(|r| r.alias == current) {
            Some(parent) => current = parent.through.as_str(),
            None => break,
        }
    }

    segments.reverse();
    segments.join("__")
}

/// Builds the SELECT column list for a flat relation list.
///
/// One entry per `BelongsTo` field, one subquery entry per `HasMany` relation
/// correlated against `main_alias`. Manual relations pass their configured
/// columns through, prefixing any without an explicit alias. Relations with
/// no schema and no manual config contribute nothing.
pub fn build_relation_select_columns(main_alias: &str, relations: &[Relation]) -> Vec<String> {
    let mut columns = Vec::new();

    for rel in relations {
        if let Some(manual) = &rel.manual {
            let prefix = scoped_prefix(rel, relations);
            for col in &manual.columns {
                if col.contains(" AS ") || col.contains(" as ") {
                    columns.push(col.clone());
                } else {
                    columns.push(format!("{}.{} AS {}__{}", rel.alias, col, prefix, col));
                }
            }
            continue;
        }

        let Some(schema) = &rel.schema else {
            continue;
        };

        match rel.kind {
            RelationKind::HasMany => {
                // A subquery needs a parent alias to correlate against.
                if main_alias.is_empty() {
                    continue;
                }
                columns.push(render_has_many_column(rel, schema.as_ref(), main_alias));
            }
            RelationKind::BelongsTo => {
                let prefix = scoped_prefix(rel, relations);
                for field in schema.fields() {
                    columns.push(format!(
                        "{}.{} AS {}__{}",
                        rel.alias,
                        field.name(),
                        prefix,
                        field.name()
                    ));
                }
            }
        }
    }

    crate::crud_trace_plan!("select_columns", columns.len());
    columns
}

/// Builds the standalone `HasMany` subquery expressions for a relation list.
///
/// Returns one `(SELECT ...) AS <alias>__json` string per `HasMany` relation
/// that has a schema. Empty `main_table` or `main_alias` yields no subqueries;
/// there is nothing valid to correlate against.
pub fn build_has_many_subqueries(
    main_table: &str,
    main_alias: &str,
    relations: &[Relation],
) -> Vec<String> {
    if main_table.is_empty() || main_alias.is_empty() {
        return Vec::new();
    }

    let mut subqueries = Vec::new();
    for rel in relations {
        if rel.kind != RelationKind::HasMany {
            continue;
        }
        let Some(schema) = &rel.schema else {
            continue;
        };
        subqueries.push(render_has_many_column(rel, schema.as_ref(), main_alias));
    }

    crate::crud_trace_plan!("has_many_subqueries", subqueries.len());
    subqueries
}

fn render_has_many_column(rel: &Relation, schema: &dyn Schema, correlate: &str) -> String {
    let mut sql = String::new();
    let mut visited = HashSet::new();
    write_has_many_subquery(rel, schema, &rel.alias, correlate, &mut visited, &mut sql);
    sql.push_str(" AS ");
    sql.push_str(&rel.alias);
    sql.push_str("__json");
    sql
}

/// Writes `(SELECT COALESCE(JSON_AGG(json_build_object(...)), '[]'::json)
/// FROM <table> <chain> <joins> WHERE <chain>.<remote> = <correlate>.<local>)`.
///
/// `chain` is the subquery-internal alias for the child table; nested tables
/// extend it with single underscores (`docs`, `docs_da`, `docs_da_regions`),
/// keeping aliases unique across nesting levels.
fn write_has_many_subquery(
    rel: &Relation,
    schema: &dyn Schema,
    chain: &str,
    correlate: &str,
    visited: &mut HashSet<(String, String)>,
    sql: &mut String,
) {
    let mut joins = Vec::new();
    let mut object = String::new();
    write_json_object(schema, chain, &mut joins, visited, &mut object);

    sql.push_str("(SELECT COALESCE(JSON_AGG(");
    sql.push_str(&object);
    sql.push_str("), '[]'::json) FROM ");
    sql.push_str(schema.name());
    sql.push(' ');
    sql.push_str(chain);
    for join in &joins {
        sql.push(' ');
        sql.push_str(join);
    }
    sql.push_str(" WHERE ");
    sql.push_str(chain);
    sql.push('.');
    sql.push_str(rel.remote_key_or_id());
    sql.push_str(" = ");
    sql.push_str(correlate);
    sql.push('.');
    sql.push_str(&rel.local_key);
    sql.push(')');
}

/// Writes `json_build_object('field', chain.field, ...)` for a schema's own
/// fields, then recurses into its relations: nested `BelongsTo` contributes a
/// nested object plus a LEFT JOIN collected into `joins`, nested `HasMany`
/// contributes a further correlated subquery.
///
/// The visited set is keyed by (table name, child alias) so cyclic schema
/// definitions render each edge once instead of recursing forever.
fn write_json_object(
    schema: &dyn Schema,
    chain: &str,
    joins: &mut Vec<String>,
    visited: &mut HashSet<(String, String)>,
    sql: &mut String,
) {
    sql.push_str("json_build_object(");

    let mut first = true;
    for field in schema.fields() {
        if !first {
            sql.push_str(", ");
        }
        first = false;
        sql.push('\'');
        sql.push_str(field.name());
        sql.push_str("', ");
        sql.push_str(chain);
        sql.push('.');
        sql.push_str(field.name());
    }

    if let Some(children) = schema.relations() {
        for child in children {
            if !visited.insert((schema.name().to_string(), child.alias.clone())) {
                continue;
            }
            let Some(child_schema) = &child.schema else {
                continue;
            };
            let child_chain = format!("{}_{}", chain, child.alias);

            if !first {
                sql.push_str(", ");
            }
            first = false;
            sql.push('\'');
            sql.push_str(&child.alias);
            sql.push_str("', ");

            match child.kind {
                RelationKind::BelongsTo => {
                    joins.push(format!(
                        "LEFT JOIN {} {} ON {}.{} = {}.{}",
                        child_schema.name(),
                        child_chain,
                        chain,
                        child.local_key,
                        child_chain,
                        child.remote_key_or_id()
                    ));
                    write_json_object(child_schema.as_ref(), &child_chain, joins, visited, sql);
                }
                RelationKind::HasMany => {
                    write_has_many_subquery(
                        child,
                        child_schema.as_ref(),
                        &child_chain,
                        chain,
                        visited,
                        sql,
                    );
                }
            }
        }
    }

    sql.push(')');
}
