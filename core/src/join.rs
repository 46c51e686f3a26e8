//! JOIN clause types, rendering, and validation.
//!
//! [`build_relation_join_clauses`] turns `BelongsTo` relations into
//! [`JoinClause`] records. [`JoinOptions`] carries caller-supplied joins and
//! select columns, validated against injection before they reach a query.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CrudError, Result};
use crate::relation::{Relation, RelationKind};

// =============================================================================
// Join Type
// =============================================================================

/// The type of JOIN operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        })
    }
}

// =============================================================================
// Join Clause
// =============================================================================

/// A single JOIN clause of a SQL query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    /// Table to join, possibly schema-qualified.
    pub table: String,
    /// Bare alias for the joined table. JOIN aliases never carry the scoped
    /// column prefix; SQL table aliases need not encode ancestry.
    pub table_alias: String,
    /// Left side of the ON condition, e.g. `users.role_id`.
    pub left_column: String,
    /// Right side of the ON condition, e.g. `roles.id`.
    pub right_column: String,
}

impl JoinClause {
    /// Renders `<JoinType> <Table> <TableAlias> ON <LeftColumn> = <RightColumn>`.
    pub fn to_sql(&self) -> String {
        format!(
            "{} {} {} ON {} = {}",
            self.join_type, self.table, self.table_alias, self.left_column, self.right_column
        )
    }

    /// Rejects empty, malformed, or injection-bearing clause parts.
    pub fn validate(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(CrudError::InvalidJoin("join table cannot be empty".into()));
        }
        if self.left_column.is_empty() {
            return Err(CrudError::InvalidJoin(
                "join left column cannot be empty".into(),
            ));
        }
        if self.right_column.is_empty() {
            return Err(CrudError::InvalidJoin(
                "join right column cannot be empty".into(),
            ));
        }

        // Injection checks run before shape checks.
        for val in [
            &self.table,
            &self.table_alias,
            &self.left_column,
            &self.right_column,
        ] {
            if val.is_empty() {
                continue;
            }
            check_dangerous_sql(val)?;
        }

        for (val, what) in [
            (&self.table, "table"),
            (&self.left_column, "left column"),
            (&self.right_column, "right column"),
        ] {
            if !VALID_COLUMN.is_match(val) {
                return Err(CrudError::InvalidJoin(format!(
                    "invalid {what} specification: {val:?}"
                )));
            }
        }
        if !self.table_alias.is_empty() && !VALID_COLUMN.is_match(&self.table_alias) {
            return Err(CrudError::InvalidJoin(format!(
                "invalid table alias specification: {:?}",
                self.table_alias
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Join Options
// =============================================================================

/// Join configuration for a List query: caller-supplied JOIN clauses plus an
/// optional select-column override.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    pub joins: Vec<JoinClause>,
    /// Columns to select; empty means the caller's default SELECT.
    pub select_columns: Vec<String>,
}

impl JoinOptions {
    pub fn validate(&self) -> Result<()> {
        for (i, join) in self.joins.iter().enumerate() {
            join.validate()
                .map_err(|e| CrudError::InvalidJoin(format!("join clause {i}: {e}")))?;
        }
        validate_select_columns(&self.select_columns)
    }

    pub fn to_sql(&self) -> Vec<String> {
        self.joins.iter().map(JoinClause::to_sql).collect()
    }
}

/// Combines default schema joins with request-specific joins. Request joins
/// are appended after defaults; request select columns win when non-empty.
pub fn merge_join_options(
    defaults: Option<JoinOptions>,
    request: Option<JoinOptions>,
) -> Option<JoinOptions> {
    let defaults = match defaults {
        Some(d) => d,
        None => return request,
    };
    let request = match request {
        Some(r) => r,
        None => return Some(defaults),
    };

    let mut joins = Vec::with_capacity(defaults.joins.len() + request.joins.len());
    joins.extend(defaults.joins);
    joins.extend(request.joins);

    let select_columns = if request.select_columns.is_empty() {
        defaults.select_columns
    } else {
        request.select_columns
    };

    Some(JoinOptions {
        joins,
        select_columns,
    })
}

// =============================================================================
// Relation -> JoinClause
// =============================================================================

/// Emits one JOIN clause per `BelongsTo` relation.
///
/// `HasMany` relations never join, and relations without a table source are
/// silently omitted. The left side of the ON condition references the main
/// table for root relations and the parent's bare alias for nested ones.
/// Clauses come out in input order; pass a topologically sorted list for
/// deterministic multi-relation SQL.
pub fn build_relation_join_clauses(main_table: &str, relations: &[Relation]) -> Vec<JoinClause> {
    let mut clauses = Vec::with_capacity(relations.len());

    for rel in relations {
        if rel.kind == RelationKind::HasMany {
            continue;
        }
        let Some(table) = rel.table_name() else {
            continue;
        };

        let left_table = if rel.through.is_empty() {
            main_table
        } else {
            &rel.through
        };

        clauses.push(JoinClause {
            join_type: rel.join_type,
            table: table.to_string(),
            table_alias: rel.alias.clone(),
            left_column: format!("{}.{}", left_table, rel.local_key),
            right_column: format!("{}.{}", rel.alias, rel.remote_key_or_id()),
        });
    }

    crate::crud_trace_plan!("join_clauses", clauses.len());
    clauses
}

// =============================================================================
// Validation patterns
// =============================================================================

/// Simple column references for JOIN parts: `column`, `table.column`,
/// `schema.table.column`, JSONB extraction `col->>'key'`, optional `AS` alias.
static VALID_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_*][a-zA-Z0-9_]*){0,2}(->>?'[a-zA-Z0-9_]+')?(\s+[Aa][Ss]\s+[a-zA-Z_][a-zA-Z0-9_]*)?$",
    )
    .expect("valid column pattern")
});

/// Select columns additionally allow function calls, which must carry an alias:
/// `row_to_json(t.*) AS data`.
static VALID_SELECT_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-zA-Z_][a-zA-Z0-9_]*\([^)]+\)\s+[Aa][Ss]\s+[a-zA-Z_][a-zA-Z0-9_]*|[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_*][a-zA-Z0-9_]*){0,2}(->>?'[a-zA-Z0-9_]+')?)(\s+[Aa][Ss]\s+[a-zA-Z_][a-zA-Z0-9_]*)?$",
    )
    .expect("valid select column pattern")
});

/// Word-boundary match keeps `created_at` from tripping on `create`.
static DANGEROUS_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(union|select|insert|update|delete|drop|create|alter|exec|execute)\b")
        .expect("dangerous keyword pattern")
});

/// Exact substrings that are always injection attempts.
const DANGEROUS_LITERALS: [&str; 4] = ["--", "/*", "*/", ";"];

fn check_dangerous_sql(val: &str) -> Result<()> {
    for lit in DANGEROUS_LITERALS {
        if val.contains(lit) {
            return Err(CrudError::InvalidJoin(format!(
                "contains dangerous SQL literal {lit:?}: {val:?}"
            )));
        }
    }
    if DANGEROUS_KEYWORDS.is_match(val) {
        return Err(CrudError::InvalidJoin(format!(
            "contains dangerous SQL keyword: {val:?}"
        )));
    }
    Ok(())
}

fn validate_select_columns(columns: &[String]) -> Result<()> {
    for col in columns {
        let col = col.trim();
        if col.is_empty() {
            return Err(CrudError::InvalidJoin("empty column specification".into()));
        }
        if col == "*" {
            continue;
        }
        check_dangerous_sql(col)?;
        if !VALID_SELECT_COLUMN.is_match(col) {
            return Err(CrudError::InvalidJoin(format!(
                "invalid column specification: {col:?} (must be 'table.column', 'column AS alias', or similar)"
            )));
        }
    }
    Ok(())
}
