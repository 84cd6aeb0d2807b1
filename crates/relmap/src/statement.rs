//! Insert statement generation.
//!
//! Turns a plan plus an operation context into dialect-correct SQL text and
//! its positional arguments.

use crate::context::OperationContext;
use crate::dialect::Dialect;
use crate::mapper::InsertPlan;
use crate::schema::Table;
use crate::value::Value;

/// SQL text with positional arguments, binding order matching argument order
/// exactly.
#[derive(Debug, Clone)]
pub struct Statement {
    /// The statement text.
    pub sql: String,
    /// Bound arguments in placeholder order.
    pub args: Vec<Value>,
}

/// Builds insert statements for one dialect.
///
/// The dialect descriptor is resolved once per engine configuration; the
/// builder never re-dispatches on a database-family name per statement.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder {
    dialect: Dialect,
}

impl StatementBuilder {
    /// Creates a builder for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Builds the single-record insert statement, including the inline
    /// generated-key return clause where the dialect supports one.
    #[must_use]
    pub fn insert(&self, table: &Table, plan: InsertPlan, ctx: &OperationContext) -> Statement {
        let (columns, args) = plan.into_parts();
        let mut statement = self.insert_row(table.name(), &columns, args, ctx);

        if let Some(auto) = table.auto_increment() {
            if let Some(clause) = self.dialect.returning_clause(auto) {
                statement.sql.push_str(&clause);
            }
        }

        Self::trace(table.name(), &statement);
        statement
    }

    /// Builds a single-row insert for an explicit column/argument list, as
    /// used by the generic-mapping path. No return clause is appended.
    #[must_use]
    pub fn insert_map(
        &self, table_name: &str, columns: &[String], args: Vec<Value>, ctx: &OperationContext,
    ) -> Statement {
        let statement = self.insert_row(table_name, columns, args, ctx);
        Self::trace(table_name, &statement);
        statement
    }

    fn insert_row(
        &self, table_name: &str, columns: &[String], args: Vec<Value>, ctx: &OperationContext,
    ) -> Statement {
        let mut sql = format!("INSERT INTO {}", self.dialect.quote(table_name));
        let exprs = ctx.exprs();

        if columns.is_empty() && exprs.is_empty() {
            sql.push_str(self.dialect.empty_row_clause());
            return Statement { sql, args };
        }

        sql.push_str(" (");
        self.write_column_list(&mut sql, columns, ctx);
        sql.push(')');

        if let Some(cond) = ctx.cond() {
            // Insert-select form: the caller-supplied values are rendered as
            // literals in the SELECT list rather than re-read from the source
            // row.
            sql.push_str(" SELECT ");
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                arg.write_literal(&mut sql);
            }

            let mut out_args = Vec::new();
            for (i, expr) in exprs.iter().enumerate() {
                if i > 0 || !args.is_empty() {
                    sql.push_str(", ");
                }
                sql.push_str(&expr.sql);
                out_args.extend(expr.args.iter().cloned());
            }

            sql.push_str(&format!(" FROM {} WHERE ", self.dialect.quote(table_name)));
            sql.push_str(&cond.sql);
            out_args.extend(cond.args.iter().cloned());

            return Statement { sql, args: out_args };
        }

        sql.push_str(" VALUES (");
        for i in 0..columns.len() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('?');
        }

        let mut out_args = args;
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 || !columns.is_empty() {
                sql.push_str(", ");
            }
            sql.push_str(&expr.sql);
            out_args.extend(expr.args.iter().cloned());
        }
        sql.push(')');

        Statement { sql, args: out_args }
    }

    /// Builds the multi-row insert statement: one VALUES group per row, the
    /// column set shared by every row.
    ///
    /// Oracle has no multi-value VALUES syntax and uses its `INSERT ALL`
    /// form instead.
    #[must_use]
    pub fn insert_multi(
        &self, table_name: &str, columns: &[String], rows: Vec<Vec<Value>>,
    ) -> Statement {
        let quoted_table = self.dialect.quote(table_name);
        let quoted_columns = columns
            .iter()
            .map(|col| self.dialect.quote(col))
            .collect::<Vec<_>>()
            .join(", ");

        let group = {
            let mut group = String::new();
            for i in 0..columns.len() {
                if i > 0 {
                    group.push_str(", ");
                }
                group.push('?');
            }
            group
        };

        let mut args = Vec::new();
        let row_count = rows.len();
        for row in rows {
            args.extend(row);
        }

        let sql = if self.dialect == Dialect::Oracle {
            let into = format!("INTO {quoted_table} ({quoted_columns}) VALUES ({group})");
            let mut sql = String::from("INSERT ALL ");
            for i in 0..row_count {
                if i > 0 {
                    sql.push(' ');
                }
                sql.push_str(&into);
            }
            sql.push_str(" SELECT 1 FROM DUAL");
            sql
        } else {
            let groups = vec![group; row_count].join("),(");
            format!("INSERT INTO {quoted_table} ({quoted_columns}) VALUES ({groups})")
        };

        let statement = Statement { sql, args };
        Self::trace(table_name, &statement);
        statement
    }

    fn write_column_list(&self, sql: &mut String, columns: &[String], ctx: &OperationContext) {
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.dialect.quote(col));
        }
        for (i, expr) in ctx.exprs().iter().enumerate() {
            if i > 0 || !columns.is_empty() {
                sql.push_str(", ");
            }
            sql.push_str(&self.dialect.quote(&expr.name));
        }
    }

    fn trace(table: &str, statement: &Statement) {
        tracing::debug!(
            table,
            sql = %statement.sql,
            param_count = statement.args.len(),
            "generated insert SQL"
        );
    }
}
