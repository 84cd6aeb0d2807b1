//! Relational record-mapping insert engine.
//!
//! Given arbitrary record values (single records, slices of records, or
//! string-keyed mappings), the engine discovers which columns to write,
//! builds dialect-correct SQL, resolves identifier generation (store
//! auto-increment, an external sequence, or a distributed id generator), and
//! runs before/after mutation hooks in a well-defined order.
//!
//! # Quick Start
//!
//! ## Define a record and its table
//!
//! ```ignore
//! use relmap::{Column, Table, record};
//!
//! record! {
//!     table = "users",
//!     #[derive(Debug, Clone, Default)]
//!     pub struct User {
//!         pub id: i64,
//!         pub name: String,
//!         pub active: bool,
//!     }
//! }
//!
//! let users = Table::builder(User::TABLE)
//!     .column(Column::new("id").auto_increment())
//!     .column(Column::new("name"))
//!     .column(Column::new("active"))
//!     .build();
//! ```
//!
//! ## Insert
//!
//! ```ignore
//! use relmap::{Dialect, Engine, OperationContext};
//!
//! let engine = Engine::builder(Dialect::Postgres).build();
//! let mut session = engine.session(executor);
//!
//! let mut user = User { id: 0, name: "ada".into(), active: true };
//! let affected = session.insert(&users, &OperationContext::new(), &mut user)?;
//! assert_ne!(user.id, 0); // generated key written back
//!
//! // Batches use one multi-row statement where the dialect allows it.
//! session.insert_many(&users, &OperationContext::new(), &mut batch)?;
//!
//! // Generic mappings bind a single row with deterministic column order.
//! session.insert_map("users", &OperationContext::new(), &values)?;
//! ```
//!
//! ## Per-call behavior
//!
//! ```ignore
//! // Copy-insert rows matching a predicate instead of literal VALUES.
//! let ctx = OperationContext::new().r#where("id = ?", vec![7.into()]);
//!
//! // Restrict or extend the column plan.
//! let ctx = OperationContext::new()
//!     .omit("debug_only")
//!     .expr("counter", "counter + 1", vec![]);
//! ```
//!
//! The engine does not manage connections, transactions, or retries; callers
//! supply an [`SqlExecutor`] and own atomicity via enclosing transactions.

mod assign;
mod context;
mod dialect;
mod error;
mod executor;
mod hooks;
mod mapper;
mod record;
mod schema;
mod session;
mod snowflake;
mod statement;
mod value;

pub use assign::SequenceGenerator;
pub use context::OperationContext;
pub use dialect::{Dialect, KeyRetrieval};
pub use error::{Error, Result};
pub use executor::{ExecResult, Row, SqlExecutor};
pub use hooks::{BeanKey, HookClosure, HookRunner};
pub use mapper::InsertPlan;
pub use record::{HookCapability, Record};
pub use schema::{Column, Table, TableBuilder};
pub use session::{Engine, EngineBuilder, Session};
pub use snowflake::SnowflakeGenerator;
pub use statement::{Statement, StatementBuilder};
pub use value::{FromValue, Value};
