//! Execution contract with the underlying store.
//!
//! The engine never manages connections, transactions, or retries; it hands
//! finished statements to an [`SqlExecutor`] and interprets the result.

use crate::error::Result;
use crate::value::Value;

/// Outcome of executing a statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecResult {
    /// Rows affected by the statement.
    pub rows_affected: u64,
    /// Driver-reported generated key, where the driver supports one.
    pub last_insert_id: Option<i64>,
}

/// One result row, as returned by generated-key retrieval queries.
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// Column name/value pairs in result order.
    pub fields: Vec<(String, Value)>,
}

impl Row {
    /// Looks up a field by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    /// The first field's value, for single-column results.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.fields.first().map(|(_, value)| value)
    }
}

/// Executes statements against the underlying store.
///
/// Cancellation and timeouts belong to implementations of this trait; the
/// engine performs no compensating rollback of in-memory mutations when a
/// call fails.
pub trait SqlExecutor {
    /// Executes a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns an execution error when the store rejects or fails the
    /// statement.
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult>;

    /// Executes a statement and returns its result rows.
    ///
    /// # Errors
    ///
    /// Returns an execution error when the store rejects or fails the
    /// statement.
    fn query(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>>;
}

impl<T: SqlExecutor + ?Sized> SqlExecutor for &mut T {
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        (**self).execute(sql, args)
    }

    fn query(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        (**self).query(sql, args)
    }
}
