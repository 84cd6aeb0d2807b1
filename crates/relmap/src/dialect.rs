//! Dialect descriptors.
//!
//! Each target store resolves to one descriptor when the engine is
//! configured; statement generation consults the descriptor rather than
//! re-deriving dialect behavior per call.

/// How a generated key is obtained after an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRetrieval {
    /// The driver reports the last inserted id with the execution result.
    Driver,
    /// The statement carries an inline return clause and yields a result row.
    ReturnedRow,
    /// A dialect-specific follow-up read fetches the current sequence value.
    FollowUpQuery,
}

/// A target store's SQL variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// MySQL / MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    MsSql,
    /// Oracle.
    Oracle,
    /// Google Cloud Spanner.
    Spanner,
}

impl Dialect {
    /// Quotes an identifier with the dialect's quote characters.
    #[must_use]
    pub fn quote(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{ident}`"),
            Self::MsSql => format!("[{ident}]"),
            Self::Postgres | Self::Sqlite | Self::Oracle | Self::Spanner => {
                format!("\"{ident}\"")
            }
        }
    }

    /// The clause used when a row has no eligible columns at all.
    #[must_use]
    pub const fn empty_row_clause(self) -> &'static str {
        match self {
            Self::MySql => " VALUES ()",
            _ => " DEFAULT VALUES",
        }
    }

    /// An inline clause returning the generated key, for dialects that
    /// support one.
    #[must_use]
    pub fn returning_clause(self, column: &str) -> Option<String> {
        match self {
            Self::Postgres => Some(format!(" RETURNING {}", self.quote(column))),
            Self::Spanner => Some(format!(" THEN RETURN {}", self.quote(column))),
            _ => None,
        }
    }

    /// How generated keys are retrieved for this dialect.
    #[must_use]
    pub const fn key_retrieval(self) -> KeyRetrieval {
        match self {
            Self::Postgres | Self::Spanner => KeyRetrieval::ReturnedRow,
            Self::Oracle => KeyRetrieval::FollowUpQuery,
            Self::MySql | Self::Sqlite | Self::MsSql => KeyRetrieval::Driver,
        }
    }

    /// The follow-up statement reading the current sequence value, for the
    /// follow-up-query retrieval family.
    #[must_use]
    pub fn follow_up_key_query(self, table: &str) -> Option<String> {
        match self {
            Self::Oracle => Some(format!("SELECT seq_{table}.currval FROM DUAL")),
            _ => None,
        }
    }

    /// Whether one statement may carry several VALUES groups.
    #[must_use]
    pub const fn supports_multi_rows(self) -> bool {
        !matches!(self, Self::MsSql)
    }
}
