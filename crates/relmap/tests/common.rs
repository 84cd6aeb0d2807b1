//! Common test helpers shared across integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use relmap::{
    Column, Error, ExecResult, HookCapability, Record, Result, Row, SqlExecutor, Table, Value,
    record,
};

// Common test records used across multiple test files

record! {
    table = "users",
    #[derive(Debug, Clone, Default)]
    pub struct User {
        pub id: i64,
        pub name: String,
        pub active: bool,
    }
}

record! {
    table = "articles",
    #[derive(Debug, Clone, Default)]
    pub struct Article {
        pub id: i64,
        pub title: String,
        pub created_at: Option<DateTime<Utc>>,
        pub updated_at: Option<DateTime<Utc>>,
    }
}

record! {
    table = "documents",
    #[derive(Debug, Clone, Default)]
    pub struct Document {
        pub id: i64,
        pub body: String,
        pub revision: i64,
    }
}

record! {
    table = "notes",
    #[derive(Debug, Clone, Default)]
    pub struct Note {
        pub id: i64,
        pub text: String,
    }
}

pub fn users_table() -> Table {
    Table::builder("users")
        .column(Column::new("id").auto_increment())
        .column(Column::new("name"))
        .column(Column::new("active"))
        .build()
}

pub fn users_table_random_id() -> Table {
    Table::builder("users")
        .column(Column::new("id").random_id())
        .column(Column::new("name"))
        .column(Column::new("active"))
        .build()
}

pub fn articles_table() -> Table {
    Table::builder("articles")
        .column(Column::new("id").auto_increment())
        .column(Column::new("title"))
        .column(Column::new("created_at").created())
        .column(Column::new("updated_at").updated())
        .build()
}

pub fn documents_table() -> Table {
    Table::builder("documents")
        .column(Column::new("id").auto_increment())
        .column(Column::new("body"))
        .column(Column::new("revision").version())
        .build()
}

pub fn notes_table() -> Table {
    Table::builder("notes")
        .column(Column::new("id").auto_increment())
        .column(Column::new("text").nullable())
        .build()
}

/// Record with insert hooks and an out-of-band event log, implemented by
/// hand rather than through the macro.
pub struct Hooked {
    pub id: i64,
    pub name: String,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl Hooked {
    pub fn new(name: &str, log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            log,
        }
    }
}

impl Record for Hooked {
    fn get(&self, column: &str) -> Result<Value> {
        match column {
            "id" => Ok(self.id.into()),
            "name" => Ok(self.name.clone().into()),
            _ => Err(Error::FieldAccess {
                column: column.to_string(),
                reason: "not a column of Hooked".to_string(),
            }),
        }
    }

    fn set(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "id" => {
                self.id = value.as_i64().unwrap_or_default();
                Ok(())
            }
            "name" => {
                if let Value::Str(name) = value {
                    self.name = name;
                }
                Ok(())
            }
            _ => Err(Error::FieldAccess {
                column: column.to_string(),
                reason: "not a column of Hooked".to_string(),
            }),
        }
    }

    fn hook_capability(&self) -> HookCapability {
        HookCapability::INSERT_HOOKS
    }

    fn before_insert(&mut self) {
        self.log.borrow_mut().push("record:before_insert".to_string());
    }

    fn after_insert(&mut self) {
        self.log.borrow_mut().push("record:after_insert".to_string());
    }
}

pub fn hooked_table() -> Table {
    Table::builder("hooked")
        .column(Column::new("id").auto_increment())
        .column(Column::new("name"))
        .build()
}

/// Scriptable in-memory executor that records every statement it receives.
#[derive(Default)]
pub struct MockExecutor {
    /// Every statement handed to the executor, in order.
    pub calls: Vec<(String, Vec<Value>)>,
    exec_script: VecDeque<std::result::Result<ExecResult, String>>,
    query_script: VecDeque<std::result::Result<Vec<Row>, String>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next `execute` outcome.
    pub fn on_execute(&mut self, result: ExecResult) -> &mut Self {
        self.exec_script.push_back(Ok(result));
        self
    }

    pub fn on_execute_error(&mut self, message: &str) -> &mut Self {
        self.exec_script.push_back(Err(message.to_string()));
        self
    }

    /// Scripts the next `query` outcome.
    pub fn on_query(&mut self, rows: Vec<Row>) -> &mut Self {
        self.query_script.push_back(Ok(rows));
        self
    }

    pub fn sql(&self, index: usize) -> &str {
        &self.calls[index].0
    }

    pub fn args(&self, index: usize) -> &[Value] {
        &self.calls[index].1
    }
}

impl SqlExecutor for MockExecutor {
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        self.calls.push((sql.to_string(), args.to_vec()));
        match self.exec_script.pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(Error::Execution(message)),
            None => Ok(ExecResult {
                rows_affected: 1,
                last_insert_id: None,
            }),
        }
    }

    fn query(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        self.calls.push((sql.to_string(), args.to_vec()));
        match self.query_script.pop_front() {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(Error::Execution(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Builds a one-column result row.
pub fn row(column: &str, value: Value) -> Row {
    Row {
        fields: vec![(column.to_string(), value)],
    }
}
