//! Record-to-plan mapping.
//!
//! Walks a table's column metadata against a record instance and produces
//! the ordered (column, argument) plan for one insert.

use chrono::{DateTime, Utc};

use crate::context::OperationContext;
use crate::error::Result;
use crate::hooks::HookRunner;
use crate::record::Record;
use crate::schema::Table;
use crate::value::Value;

/// Ordered column names with their parallel bound arguments.
///
/// The two sequences always have equal length.
#[derive(Debug, Default, Clone)]
pub struct InsertPlan {
    columns: Vec<String>,
    args: Vec<Value>,
}

impl InsertPlan {
    /// Column names in plan order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Bound arguments, parallel to [`columns`](Self::columns).
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Whether the plan binds `column`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    /// Number of bound columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the plan binds no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Appends a column with its bound argument.
    pub fn push(&mut self, column: impl Into<String>, arg: Value) {
        self.columns.push(column.into());
        self.args.push(arg);
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        (self.columns, self.args)
    }
}

/// Produces the insert plan for one record.
///
/// Columns are visited in table-declaration order. Timestamp columns bind the
/// supplied `now` and register a write-back closure on `hooks` so the record's
/// own field reflects what was persisted. A field-access failure aborts before
/// any SQL is issued.
pub(crate) fn insert_plan(
    table: &Table, ctx: &OperationContext, record: &dyn Record, hooks: &mut HookRunner,
    now: DateTime<Utc>,
) -> Result<InsertPlan> {
    let mut plan = InsertPlan::default();

    for col in table.columns() {
        if col.is_deleted() {
            continue;
        }
        if ctx.is_omitted(col.name()) || ctx.is_excluded_by_include(col.name()) {
            continue;
        }
        if ctx.is_expr_handled(col.name()) {
            continue;
        }

        let value = record.get(col.name())?;

        // Generated columns holding their zero value are left to the id
        // assignment step.
        if (col.is_auto_increment() || col.is_random_id()) && value.is_zero() {
            continue;
        }

        if (col.is_created() || col.is_updated()) && ctx.auto_time() {
            plan.push(col.name(), Value::Timestamp(now));
            hooks.push_after_set(col.name().to_string(), Value::Timestamp(now));
            continue;
        }

        if col.is_version() && ctx.check_version() {
            plan.push(col.name(), Value::Int(1));
            continue;
        }

        if col.is_nullable() && value.is_zero() {
            plan.push(col.name(), Value::Null);
            continue;
        }

        plan.push(col.name(), value);
    }

    Ok(plan)
}
