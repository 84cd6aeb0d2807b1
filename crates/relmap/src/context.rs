use std::collections::HashSet;

use crate::value::Value;

/// A raw SQL fragment standing in for a column value, with its own bound
/// arguments. Rendered verbatim after the placeholder columns.
#[derive(Debug, Clone)]
pub(crate) struct ExprColumn {
    pub name: String,
    pub sql: String,
    pub args: Vec<Value>,
}

/// A row-selection predicate that switches the statement into its
/// insert-select form.
#[derive(Debug, Clone)]
pub(crate) struct Condition {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Transient per-call state for one insert operation.
///
/// Each logical insert call owns its own context; contexts are never shared
/// between concurrent calls.
#[derive(Debug, Clone)]
pub struct OperationContext {
    omit: HashSet<String>,
    include: HashSet<String>,
    incr: HashSet<String>,
    decr: HashSet<String>,
    exprs: Vec<ExprColumn>,
    cond: Option<Condition>,
    auto_time: bool,
    check_version: bool,
}

impl Default for OperationContext {
    fn default() -> Self {
        Self {
            omit: HashSet::new(),
            include: HashSet::new(),
            incr: HashSet::new(),
            decr: HashSet::new(),
            exprs: Vec::new(),
            cond: None,
            auto_time: true,
            check_version: true,
        }
    }
}

impl OperationContext {
    /// Creates a context with default behavior: auto timestamps and version
    /// checking enabled, all columns eligible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes a column from the insert.
    #[must_use]
    pub fn omit(mut self, column: impl Into<String>) -> Self {
        self.omit.insert(column.into());
        self
    }

    /// Restricts the insert to the listed columns. When the include set is
    /// non-empty, any column outside it is skipped.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.include.extend(columns.iter().map(ToString::to_string));
        self
    }

    /// Marks a column for increment handling; it is excluded from the literal
    /// bound values.
    #[must_use]
    pub fn incr(mut self, column: impl Into<String>) -> Self {
        self.incr.insert(column.into());
        self
    }

    /// Marks a column for decrement handling; it is excluded from the literal
    /// bound values.
    #[must_use]
    pub fn decr(mut self, column: impl Into<String>) -> Self {
        self.decr.insert(column.into());
        self
    }

    /// Supplies a raw SQL fragment for a column instead of a bound value.
    #[must_use]
    pub fn expr(mut self, column: impl Into<String>, sql: impl Into<String>, args: Vec<Value>) -> Self {
        self.exprs.push(ExprColumn {
            name: column.into(),
            sql: sql.into(),
            args,
        });
        self
    }

    /// Adds a row-selection condition, switching the statement into its
    /// insert-select form: caller-supplied literals are inserted for every
    /// row matching the predicate.
    #[must_use]
    pub fn r#where(mut self, sql: impl Into<String>, args: Vec<Value>) -> Self {
        self.cond = Some(Condition {
            sql: sql.into(),
            args,
        });
        self
    }

    /// Disables automatic timestamp stamping for created/updated columns.
    #[must_use]
    pub const fn no_auto_time(mut self) -> Self {
        self.auto_time = false;
        self
    }

    /// Disables version-check handling for the version column.
    #[must_use]
    pub const fn no_version_check(mut self) -> Self {
        self.check_version = false;
        self
    }

    pub(crate) fn is_omitted(&self, column: &str) -> bool {
        self.omit.contains(column)
    }

    pub(crate) fn is_excluded_by_include(&self, column: &str) -> bool {
        !self.include.is_empty() && !self.include.contains(column)
    }

    pub(crate) fn is_expr(&self, column: &str) -> bool {
        self.exprs.iter().any(|expr| expr.name == column)
    }

    pub(crate) fn is_expr_handled(&self, column: &str) -> bool {
        self.incr.contains(column)
            || self.decr.contains(column)
            || self.exprs.iter().any(|expr| expr.name == column)
    }

    pub(crate) fn exprs(&self) -> &[ExprColumn] {
        &self.exprs
    }

    pub(crate) fn cond(&self) -> Option<&Condition> {
        self.cond.as_ref()
    }

    pub(crate) const fn auto_time(&self) -> bool {
        self.auto_time
    }

    pub(crate) const fn check_version(&self) -> bool {
        self.check_version
    }
}
