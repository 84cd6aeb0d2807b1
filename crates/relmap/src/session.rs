//! Insert dispatch.
//!
//! [`Engine`] holds configuration resolved once (dialect descriptor, id
//! generators); [`Session`] drives one or more insert operations against an
//! executor, classifying the input shape and running the mapping, id
//! assignment, statement generation, execution, and hook pipeline.

use std::collections::HashMap;

use chrono::Utc;

use crate::assign::{self, SequenceGenerator};
use crate::context::OperationContext;
use crate::dialect::{Dialect, KeyRetrieval};
use crate::error::{Error, Result};
use crate::executor::SqlExecutor;
use crate::hooks::HookRunner;
use crate::mapper;
use crate::record::Record;
use crate::schema::{Column, Table};
use crate::snowflake::SnowflakeGenerator;
use crate::statement::{Statement, StatementBuilder};
use crate::value::Value;

/// Engine configuration: the dialect descriptor plus pluggable identifier
/// generators. Built once and shared by every session.
pub struct Engine {
    dialect: Dialect,
    sequence: Option<Box<dyn SequenceGenerator>>,
    random_id: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl Engine {
    /// Starts building an engine for `dialect`.
    #[must_use]
    pub fn builder(dialect: Dialect) -> EngineBuilder {
        EngineBuilder {
            dialect,
            sequence: None,
            random_id: None,
        }
    }

    /// The dialect this engine targets.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Opens a session over `executor`.
    pub fn session<E: SqlExecutor>(&self, executor: E) -> Session<'_, E> {
        Session {
            engine: self,
            executor,
            builder: StatementBuilder::new(self.dialect),
            autocommit: true,
            hooks: HookRunner::default(),
        }
    }

    pub(crate) fn sequence_generator(&self) -> Option<&dyn SequenceGenerator> {
        self.sequence.as_deref()
    }

    pub(crate) fn next_random_id(&self) -> i64 {
        (self.random_id)()
    }
}

/// Builder for [`Engine`].
pub struct EngineBuilder {
    dialect: Dialect,
    sequence: Option<Box<dyn SequenceGenerator>>,
    random_id: Option<Box<dyn Fn() -> i64 + Send + Sync>>,
}

impl EngineBuilder {
    /// Plugs in an external sequence for auto-increment columns. When set,
    /// identifiers come from the sequence instead of the store.
    #[must_use]
    pub fn sequence_generator(mut self, sequence: impl SequenceGenerator + 'static) -> Self {
        self.sequence = Some(Box::new(sequence));
        self
    }

    /// Replaces the random-id source. Defaults to a snowflake generator with
    /// a random node id.
    #[must_use]
    pub fn random_id_generator(mut self, generator: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.random_id = Some(Box::new(generator));
        self
    }

    /// Finalizes the engine.
    #[must_use]
    pub fn build(self) -> Engine {
        let random_id = self.random_id.unwrap_or_else(|| {
            let snowflake = SnowflakeGenerator::with_random_node();
            Box::new(move || snowflake.generate())
        });

        Engine {
            dialect: self.dialect,
            sequence: self.sequence,
            random_id,
        }
    }
}

/// Drives insert operations against one executor.
///
/// A session is single-threaded: its per-call state (hook queues, operation
/// contexts) is never shared between concurrent logical calls.
pub struct Session<'e, E> {
    engine: &'e Engine,
    executor: E,
    builder: StatementBuilder,
    autocommit: bool,
    hooks: HookRunner,
}

impl<E: SqlExecutor> Session<'_, E> {
    /// Switches autocommit mode. While off (a transaction is pending),
    /// after-insert hooks are deferred for replay via
    /// [`replay_after_hooks`](Self::replay_after_hooks).
    pub const fn set_autocommit(&mut self, autocommit: bool) {
        self.autocommit = autocommit;
    }

    /// Registers a closure to run against the record before the next insert.
    pub fn before(&mut self, closure: impl Fn(&mut dyn Record) + 'static) {
        self.hooks.push_before(std::rc::Rc::new(closure));
    }

    /// Registers a closure to run against the record after the next insert.
    pub fn after(&mut self, closure: impl Fn(&mut dyn Record) + 'static) {
        self.hooks.push_after(std::rc::Rc::new(closure));
    }

    /// Replays after-hooks deferred for `record` while autocommit was off.
    pub fn replay_after_hooks(&mut self, record: &mut dyn Record) {
        self.hooks.replay_deferred(record);
    }

    /// Number of records with deferred after-hooks pending.
    #[must_use]
    pub fn deferred_hooks(&self) -> usize {
        self.hooks.deferred_len()
    }

    /// Inserts one record.
    ///
    /// Generated identifiers are written back onto the record: eagerly for
    /// random-id columns (before execution), after a successful round trip
    /// for auto-increment columns.
    ///
    /// # Errors
    ///
    /// Mapping and metadata errors abort before any SQL is issued. Execution
    /// errors propagate unchanged. Key-retrieval failure is fatal only for
    /// dialects whose contract requires the returned key.
    pub fn insert(
        &mut self, table: &Table, ctx: &OperationContext, record: &mut dyn Record,
    ) -> Result<u64> {
        let result = self.insert_one(table, ctx, record);
        if result.is_err() {
            self.hooks.clear_before();
            self.hooks.clear_after();
        }
        result
    }

    /// Inserts a batch of records.
    ///
    /// Dialects with multi-value VALUES syntax get one statement and one
    /// round trip; the rest fall back to sequential per-record inserts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBatch`] for a zero-length batch. A failure in
    /// the iterative fallback stops the batch and surfaces the partial
    /// affected count alongside the cause as [`Error::PartialBatch`];
    /// remaining records are never attempted. Batch atomicity is the
    /// caller's responsibility via an enclosing transaction.
    pub fn insert_many<R: Record>(
        &mut self, table: &Table, ctx: &OperationContext, records: &mut [R],
    ) -> Result<u64> {
        if records.is_empty() {
            return Err(Error::EmptyBatch);
        }

        if self.engine.dialect().supports_multi_rows() {
            let result = self.insert_multi_rows(table, ctx, records);
            if result.is_err() {
                self.hooks.clear_before();
                self.hooks.clear_after();
            }
            return result;
        }

        let mut affected = 0_u64;
        for record in records.iter_mut() {
            match self.insert(table, ctx, record) {
                Ok(count) => affected += count,
                Err(source) => {
                    return Err(Error::PartialBatch {
                        affected,
                        source: Box::new(source),
                    });
                }
            }
        }
        Ok(affected)
    }

    /// Inserts one row from a string-keyed mapping.
    ///
    /// Keys are sorted for deterministic column order. No id assignment,
    /// timestamp stamping, or hooks apply on this path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] for an empty mapping and
    /// [`Error::TableNotFound`] for an empty table name.
    pub fn insert_map(
        &mut self, table_name: &str, ctx: &OperationContext, values: &HashMap<String, Value>,
    ) -> Result<u64> {
        if values.is_empty() {
            return Err(Error::InvalidShape("empty mapping".to_string()));
        }
        if table_name.is_empty() {
            return Err(Error::TableNotFound);
        }

        let mut columns: Vec<&String> =
            values.keys().filter(|key| !ctx.is_expr(key)).collect();
        columns.sort();

        let args: Vec<Value> = columns.iter().map(|col| values[*col].clone()).collect();
        let columns: Vec<String> = columns.into_iter().cloned().collect();

        let statement = self.builder.insert_map(table_name, &columns, args, ctx);
        let result = self.executor.execute(&statement.sql, &statement.args)?;
        Ok(result.rows_affected)
    }

    /// Inserts one row per mapping, sequentially.
    ///
    /// # Errors
    ///
    /// Stops at the first failing element, surfacing the partial affected
    /// count as [`Error::PartialBatch`].
    pub fn insert_maps(
        &mut self, table_name: &str, ctx: &OperationContext, maps: &[HashMap<String, Value>],
    ) -> Result<u64> {
        let mut affected = 0_u64;
        for map in maps {
            match self.insert_map(table_name, ctx, map) {
                Ok(count) => affected += count,
                Err(source) => {
                    return Err(Error::PartialBatch {
                        affected,
                        source: Box::new(source),
                    });
                }
            }
        }
        Ok(affected)
    }

    fn insert_one(
        &mut self, table: &Table, ctx: &OperationContext, record: &mut dyn Record,
    ) -> Result<u64> {
        if table.name().is_empty() {
            return Err(Error::TableNotFound);
        }

        self.hooks.run_before(record);

        let now = Utc::now();
        let mut plan = mapper::insert_plan(table, ctx, record, &mut self.hooks, now)?;
        assign::apply(self.engine, table, &mut plan, record)?;

        let statement = self.builder.insert(table, plan, ctx);
        let affected = self.execute_single(table, ctx, &statement, record)?;

        self.hooks.run_after(record, self.autocommit);
        Ok(affected)
    }

    fn execute_single(
        &mut self, table: &Table, ctx: &OperationContext, statement: &Statement,
        record: &mut dyn Record,
    ) -> Result<u64> {
        let Some(auto) = table.auto_increment() else {
            let result = self.executor.execute(&statement.sql, &statement.args)?;
            stamp_version(table, ctx, record);
            return Ok(result.rows_affected);
        };

        match self.engine.dialect().key_retrieval() {
            KeyRetrieval::ReturnedRow => {
                let rows = self.executor.query(&statement.sql, &statement.args)?;
                stamp_version(table, ctx, record);

                let Some(row) = rows.first() else {
                    return Err(Error::KeyRetrieval(
                        "insert succeeded but no row was returned".to_string(),
                    ));
                };
                let id = row.get(auto).and_then(Value::as_i64).ok_or_else(|| {
                    Error::KeyRetrieval(format!("returned row has no usable `{auto}` value"))
                })?;
                assign::write_back_key(record, auto, id);
                Ok(1)
            }
            KeyRetrieval::FollowUpQuery => {
                let result = self.executor.execute(&statement.sql, &statement.args)?;
                stamp_version(table, ctx, record);

                let Some(query) = self.engine.dialect().follow_up_key_query(table.name()) else {
                    return Ok(result.rows_affected);
                };
                let rows = self.executor.query(&query, &[])?;
                let id = rows
                    .first()
                    .and_then(|row| row.first().and_then(Value::as_i64))
                    .ok_or_else(|| {
                        Error::KeyRetrieval(
                            "insert succeeded but the sequence read returned no id".to_string(),
                        )
                    })?;
                assign::write_back_key(record, auto, id);
                Ok(result.rows_affected)
            }
            KeyRetrieval::Driver => {
                let result = self.executor.execute(&statement.sql, &statement.args)?;
                stamp_version(table, ctx, record);

                if let Some(id) = result.last_insert_id.filter(|id| *id > 0) {
                    assign::write_back_key(record, auto, id);
                }
                Ok(result.rows_affected)
            }
        }
    }

    fn insert_multi_rows<R: Record>(
        &mut self, table: &Table, ctx: &OperationContext, records: &mut [R],
    ) -> Result<u64> {
        if table.name().is_empty() {
            return Err(Error::TableNotFound);
        }

        // The column set derives from the first record only; later records
        // reuse it verbatim, so a column populated only in a later record is
        // not written. Use the iterative path when that matters.
        let first = &records[0];
        let mut columns: Vec<String> = Vec::new();
        let mut cols: Vec<&Column> = Vec::new();
        for col in table.columns() {
            if col.is_deleted() {
                continue;
            }
            if ctx.is_omitted(col.name()) || ctx.is_excluded_by_include(col.name()) {
                continue;
            }
            let value = first.get(col.name())?;
            if (col.is_auto_increment() || col.is_random_id()) && value.is_zero() {
                continue;
            }
            columns.push(col.name().to_string());
            cols.push(col);
        }

        let now = Utc::now();
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());
        for record in records.iter_mut() {
            self.hooks.dispatch_before(record);

            let mut row = Vec::with_capacity(cols.len());
            for col in &cols {
                if (col.is_created() || col.is_updated()) && ctx.auto_time() {
                    row.push(Value::Timestamp(now));
                    self.hooks.push_after_set(col.name().to_string(), Value::Timestamp(now));
                } else if col.is_version() && ctx.check_version() {
                    row.push(Value::Int(1));
                    self.hooks.push_after_set(col.name().to_string(), Value::Int(1));
                } else {
                    row.push(record.get(col.name())?);
                }
            }
            rows.push(row);
        }
        self.hooks.clear_before();

        let statement = self.builder.insert_multi(table.name(), &columns, rows);
        let result = self.executor.execute(&statement.sql, &statement.args)?;

        for record in records.iter_mut() {
            self.hooks.dispatch_after(record, self.autocommit);
        }
        self.hooks.clear_after();

        Ok(result.rows_affected)
    }
}

fn stamp_version(table: &Table, ctx: &OperationContext, record: &mut dyn Record) {
    if !ctx.check_version() {
        return;
    }
    let Some(column) = table.version() else {
        return;
    };
    if let Err(err) = record.set(column, Value::Int(1)) {
        tracing::warn!(column, %err, "version write-back skipped");
    }
}
