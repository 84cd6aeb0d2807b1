//! Identifier assignment.
//!
//! Exactly one strategy applies per table, selected by which designated
//! column the metadata carries: an external sequence, the distributed id
//! generator, or the store's native auto-increment (resolved after
//! execution).

use crate::error::Result;
use crate::mapper::InsertPlan;
use crate::record::Record;
use crate::schema::Table;
use crate::session::Engine;
use crate::value::Value;

/// Supplies the next value of an external sequence.
pub trait SequenceGenerator: Send + Sync {
    /// Returns the next sequence value for `table`.`column`.
    ///
    /// # Errors
    ///
    /// Returns an error when the sequence cannot produce a value; the insert
    /// aborts before any SQL is issued.
    fn next(&self, table: &str, column: &str) -> Result<i64>;
}

/// Applies the pre-execution identifier strategy to a plan.
///
/// The sequence strategy appends the generated value without touching the
/// record; the bean only learns its id once execution succeeds. The random-id
/// strategy writes the id onto the record eagerly, before execution: a later
/// execution failure leaves the record holding an id that was never
/// persisted.
pub(crate) fn apply(
    engine: &Engine, table: &Table, plan: &mut InsertPlan, record: &mut dyn Record,
) -> Result<()> {
    if let Some(column) = table.auto_increment() {
        if let Some(sequence) = engine.sequence_generator() {
            if !plan.contains(column) {
                let next = sequence.next(table.name(), column)?;
                plan.push(column, Value::Int(next));
            }
            return Ok(());
        }
    }

    if let Some(column) = table.random_id() {
        if !plan.contains(column) {
            let id = engine.next_random_id();
            plan.push(column, Value::Int(id));
            record.set(column, Value::Int(id))?;
        }
    }

    Ok(())
}

/// Writes a retrieved generated key onto the record's identifier field.
///
/// Write-back is skipped (with a warning) when the field rejects the value;
/// the affected-row count is still reported to the caller.
pub(crate) fn write_back_key(record: &mut dyn Record, column: &str, id: i64) {
    if let Err(err) = record.set(column, Value::Int(id)) {
        tracing::warn!(column, %err, "generated key write-back skipped");
    }
}
