//! HasMany subquery tests
//!
//! Verifies the correlated JSON-aggregation subqueries generated for
//! `HasMany` relations: field objects, correlation predicates, nested
//! `BelongsTo` joins, and nested `HasMany` sub-subqueries.

use std::sync::Arc;

use crudkit_core::{Field, Relation, Schema, TableSchema, build_has_many_subqueries};

// =============================================================================
// Helper Functions
// =============================================================================

fn fields(names: &[&str]) -> Vec<Field> {
    names
        .iter()
        .map(|&n| {
            if n == "id" {
                Field::int("id").key()
            } else {
                Field::string(n)
            }
        })
        .collect()
}

fn schema(table: &str, field_names: &[&str]) -> Arc<dyn Schema> {
    Arc::new(TableSchema::new(table, fields(field_names)))
}

fn schema_with_relations(
    table: &str,
    field_names: &[&str],
    relations: Vec<Relation>,
) -> Arc<dyn Schema> {
    Arc::new(TableSchema::new(table, fields(field_names)).with_relations(relations))
}

fn docs_relation(schema: Arc<dyn Schema>) -> Relation {
    Relation::has_many("docs", "id")
        .remote_key("person_id")
        .schema(schema)
}

// =============================================================================
// Simple Subqueries
// =============================================================================

#[test]
fn simple_has_many_aggregates_own_fields() {
    let docs = schema("insurance.person_documents", &["id", "seria", "number"]);
    let relations = vec![docs_relation(docs)];

    let subqueries = build_has_many_subqueries("insurance.persons", "p", &relations);

    assert_eq!(subqueries.len(), 1);
    assert_eq!(
        subqueries[0],
        "(SELECT COALESCE(JSON_AGG(json_build_object('id', docs.id, 'seria', docs.seria, \
         'number', docs.number)), '[]'::json) FROM insurance.person_documents docs \
         WHERE docs.person_id = p.id) AS docs__json"
    );
}

#[test]
fn empty_main_table_or_alias_yields_nothing() {
    let docs = schema("insurance.person_documents", &["id", "seria", "number"]);
    let relations = vec![docs_relation(docs)];

    assert!(build_has_many_subqueries("", "p", &relations).is_empty());
    assert!(build_has_many_subqueries("insurance.persons", "", &relations).is_empty());
    assert!(build_has_many_subqueries("", "", &relations).is_empty());
}

#[test]
fn belongs_to_relations_are_ignored() {
    let vt = schema("insurance.vehicle_types", &["id", "name"]);
    let docs = schema("insurance.person_documents", &["id", "seria", "number"]);

    let relations = vec![
        Relation::belongs_to("vt", "vehicle_type_id")
            .remote_key("id")
            .left()
            .schema(vt.clone()),
        docs_relation(docs),
        Relation::belongs_to("owner", "owner_id")
            .remote_key("id")
            .left()
            .schema(vt),
    ];

    let subqueries = build_has_many_subqueries("insurance.persons", "p", &relations);

    assert_eq!(subqueries.len(), 1);
    assert!(subqueries[0].contains("docs__json"));
    assert!(!subqueries[0].contains("vt"));
    assert!(!subqueries[0].contains("owner"));
}

#[test]
fn has_many_without_schema_is_skipped() {
    let relations = vec![Relation::has_many("orphans", "id").remote_key("parent_id")];

    assert!(build_has_many_subqueries("t", "p", &relations).is_empty());
}

// =============================================================================
// Nested Relations
// =============================================================================

#[test]
fn nested_belongs_to_becomes_inline_object_with_join() {
    let authority = schema("insurance.document_authorities", &["id", "name"]);
    let docs = schema_with_relations(
        "insurance.person_documents",
        &["id", "seria", "authority_id"],
        vec![
            Relation::belongs_to("da", "authority_id")
                .remote_key("id")
                .schema(authority),
        ],
    );

    let subqueries = build_has_many_subqueries("insurance.persons", "p", &[docs_relation(docs)]);

    assert_eq!(subqueries.len(), 1);
    assert!(
        subqueries[0].contains("'da', json_build_object('id', docs_da.id, 'name', docs_da.name)")
    );
    assert!(subqueries[0].contains(
        "LEFT JOIN insurance.document_authorities docs_da ON docs.authority_id = docs_da.id"
    ));
}

#[test]
fn nested_has_many_becomes_sub_subquery() {
    let regions = schema("insurance.authority_regions", &["id", "name"]);
    let authority = schema_with_relations(
        "insurance.document_authorities",
        &["id", "name"],
        vec![
            Relation::has_many("regions", "id")
                .remote_key("authority_id")
                .schema(regions),
        ],
    );
    let docs = schema_with_relations(
        "insurance.person_documents",
        &["id", "seria"],
        vec![
            Relation::belongs_to("da", "authority_id")
                .remote_key("id")
                .schema(authority),
        ],
    );

    let subqueries = build_has_many_subqueries("insurance.persons", "p", &[docs_relation(docs)]);

    assert_eq!(subqueries.len(), 1);
    // The inner subquery chains its alias off the outer one.
    assert!(subqueries[0].contains("'regions', (SELECT COALESCE(JSON_AGG"));
    assert!(subqueries[0].contains("FROM insurance.authority_regions"));
    assert!(subqueries[0].contains("WHERE docs_da_regions.authority_id = docs_da.id"));
}

/// Schema whose relations are set after construction, for building cycles.
struct LateBoundSchema {
    name: &'static str,
    fields: Vec<Field>,
    relations: std::sync::OnceLock<Vec<Relation>>,
}

impl Schema for LateBoundSchema {
    fn name(&self) -> &str {
        self.name
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn relations(&self) -> Option<&[Relation]> {
        self.relations.get().map(Vec::as_slice)
    }
}

#[test]
fn cyclic_nested_schemas_render_each_edge_once() {
    // parent_rows -> children -> parent -> children -> ... ad infinitum
    // unless edge tracking cuts the recursion off.
    let parent = Arc::new(LateBoundSchema {
        name: "parent_rows",
        fields: fields(&["id", "name"]),
        relations: std::sync::OnceLock::new(),
    });
    let child = Arc::new(LateBoundSchema {
        name: "child_rows",
        fields: fields(&["id", "name"]),
        relations: std::sync::OnceLock::new(),
    });

    child
        .relations
        .set(vec![
            Relation::belongs_to("parent", "parent_id")
                .remote_key("id")
                .schema(parent.clone()),
        ])
        .ok()
        .expect("child relations set once");
    parent
        .relations
        .set(vec![
            Relation::has_many("children", "id")
                .remote_key("parent_id")
                .schema(child),
        ])
        .ok()
        .expect("parent relations set once");

    let relations = vec![
        Relation::has_many("kids", "id")
            .remote_key("owner_id")
            .schema(parent),
    ];

    // Must terminate and produce well-formed nesting.
    let subqueries = build_has_many_subqueries("t", "root", &relations);

    assert_eq!(subqueries.len(), 1);
    assert!(subqueries[0].ends_with(" AS kids__json"));
    let opens = subqueries[0].matches('(').count();
    let closes = subqueries[0].matches(')').count();
    assert_eq!(opens, closes);
}
