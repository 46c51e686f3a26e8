//! Schema descriptors consumed by the relation graph compiler.
//!
//! A [`Schema`] exposes a table name and an ordered field list. Schemas that
//! declare their own relations opt in by returning `Some` from
//! [`Schema::relations`]; the discovery pass checks that capability once and
//! recurses into the returned list.

use std::fmt;

use crate::field::Field;
use crate::relation::Relation;

/// Table-level schema metadata.
///
/// Object-safe so relation descriptors can hold `Arc<dyn Schema>` values of
/// heterogeneous concrete types. Implementations must be frozen for the
/// duration of a query-planning pass; the compiler never mutates them.
pub trait Schema: Send + Sync {
    /// Table name, possibly schema-qualified (`insurance.persons`).
    fn name(&self) -> &str;

    /// Ordered column list. Column order here dictates select-column order.
    fn fields(&self) -> &[Field];

    /// Relations declared on this schema, if any. `None` marks a leaf schema
    /// that the discovery pass will not recurse into.
    fn relations(&self) -> Option<&[Relation]> {
        None
    }
}

impl fmt::Debug for dyn Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name())
            .field("fields", &self.fields().len())
            .finish()
    }
}

/// Plain in-memory [`Schema`] implementation.
#[derive(Clone, Debug, Default)]
pub struct TableSchema {
    name: String,
    fields: Vec<Field>,
    relations: Vec<Relation>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            relations: Vec::new(),
        }
    }

    /// Declares relations on this schema, making it discoverable.
    pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
        self.relations = relations;
        self
    }
}

impl Schema for TableSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn relations(&self) -> Option<&[Relation]> {
        if self.relations.is_empty() {
            None
        } else {
            Some(&self.relations)
        }
    }
}
