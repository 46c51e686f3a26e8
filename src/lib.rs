//! # crudkit
//!
//! Schema-driven relation graph compilation for SQL data layers.
//!
//! A repository declares its table's fields and relations once; crudkit turns
//! that declaration into the SQL plumbing a list/get query needs:
//!
//! - `BelongsTo` relations become JOIN clauses plus flat `alias__field`
//!   select columns, nested relations prefixed by their full ancestor chain.
//! - `HasMany` relations become correlated subqueries aggregating child rows
//!   into a JSON array column, so result sets stay one row per parent.
//! - Relation trees are discovered recursively from schemas and ordered so
//!   every JOIN appears after the JOIN it references.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use crudkit::{
//!     Field, Relation, TableSchema,
//!     build_relation_join_clauses, build_relation_select_columns,
//! };
//!
//! let roles = Arc::new(TableSchema::new(
//!     "roles",
//!     vec![Field::int("id").key(), Field::string("name")],
//! ));
//!
//! let relations = vec![
//!     Relation::belongs_to("role", "role_id").left().schema(roles),
//! ];
//!
//! let columns = build_relation_select_columns("u", &relations);
//! assert_eq!(columns, ["role.id AS role__id", "role.name AS role__name"]);
//!
//! let joins = build_relation_join_clauses("users", &relations);
//! assert_eq!(
//!     joins[0].to_sql(),
//!     "LEFT JOIN roles role ON users.role_id = role.id",
//! );
//! ```

pub use crudkit_core::*;
