pub mod error;
pub mod extract;
pub mod field;
pub mod graph;
pub mod join;
pub mod relation;
pub mod schema;
pub mod select;
pub mod trace;
pub mod value;

// Re-export key types and operations
pub use error::{CrudError, Result};
pub use extract::{all_fields_null, extract_non_prefixed_fields, extract_prefixed_fields};
pub use field::{Field, FieldType};
pub use graph::{build_relations_recursive, topological_sort_relations};
pub use join::{
    JoinClause, JoinOptions, JoinType, build_relation_join_clauses, merge_join_options,
};
pub use relation::{ManualRelation, Relation, RelationKind};
pub use schema::{Schema, TableSchema};
pub use select::{build_has_many_subqueries, build_relation_select_columns, scoped_prefix};
pub use value::{FieldValue, Value};
