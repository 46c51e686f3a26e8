//! Relation descriptors: the nodes of the relation graph.
//!
//! A [`Relation`] declares how one entity links to another. `BelongsTo`
//! relations become JOINs with flat prefixed columns; `HasMany` relations
//! become correlated JSON-aggregation subqueries. The `through` field names
//! the immediate parent relation's alias and is the single source of truth
//! for graph edges, both for topological ordering and prefix scoping.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::join::JoinType;
use crate::schema::Schema;

/// How the related rows connect to the owning row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// The owning row holds the foreign key; resolved via JOIN.
    #[default]
    BelongsTo,
    /// The related rows hold the foreign key; resolved via a correlated
    /// subquery producing a JSON array, never a JOIN.
    HasMany,
}

/// Ad-hoc table source for relations without a full schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualRelation {
    pub table: String,
    pub columns: Vec<String>,
}

impl ManualRelation {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }
}

/// One node in the relation graph.
#[derive(Clone, Debug, Default)]
pub struct Relation {
    pub kind: RelationKind,
    /// SQL table alias and column-name prefix segment. Unique among siblings.
    pub alias: String,
    /// Column on the parent side of the join.
    pub local_key: String,
    /// Column on the related table; empty means `id`.
    pub remote_key: String,
    pub join_type: JoinType,
    /// Full schema of the related table, when available.
    pub schema: Option<Arc<dyn Schema>>,
    /// Fallback table source when `schema` is absent.
    pub manual: Option<ManualRelation>,
    /// Name of the mapper-output field the nested entity attaches to.
    pub entity_field: String,
    /// Alias of the immediate parent relation; empty means the relation is
    /// attached directly to the root table.
    pub through: String,
}

impl Relation {
    fn new(kind: RelationKind, alias: impl Into<String>, local_key: impl Into<String>) -> Self {
        Self {
            kind,
            alias: alias.into(),
            local_key: local_key.into(),
            ..Self::default()
        }
    }

    pub fn belongs_to(alias: impl Into<String>, local_key: impl Into<String>) -> Self {
        Self::new(RelationKind::BelongsTo, alias, local_key)
    }

    pub fn has_many(alias: impl Into<String>, local_key: impl Into<String>) -> Self {
        Self::new(RelationKind::HasMany, alias, local_key)
    }

    pub fn remote_key(mut self, key: impl Into<String>) -> Self {
        self.remote_key = key.into();
        self
    }

    pub fn inner(mut self) -> Self {
        self.join_type = JoinType::Inner;
        self
    }

    pub fn left(mut self) -> Self {
        self.join_type = JoinType::Left;
        self
    }

    pub fn right(mut self) -> Self {
        self.join_type = JoinType::Right;
        self
    }

    pub fn schema(mut self, schema: Arc<dyn Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn manual(mut self, manual: ManualRelation) -> Self {
        self.manual = Some(manual);
        self
    }

    pub fn entity_field(mut self, name: impl Into<String>) -> Self {
        self.entity_field = name.into();
        self
    }

    pub fn through(mut self, alias: impl Into<String>) -> Self {
        self.through = alias.into();
        self
    }

    /// Remote join column, defaulting to `id` when unset.
    pub fn remote_key_or_id(&self) -> &str {
        if self.remote_key.is_empty() {
            "id"
        } else {
            &self.remote_key
        }
    }

    /// Table to join against: the schema's table, else the manual override.
    /// `None` means the relation has no table source and is skipped by the
    /// SQL builders.
    pub fn table_name(&self) -> Option<&str> {
        if let Some(schema) = &self.schema {
            return Some(schema.name());
        }
        self.manual.as_ref().map(|m| m.table.as_str())
    }
}
