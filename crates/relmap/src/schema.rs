//! Table and column metadata.
//!
//! Metadata is constructed once at schema-registration time and treated as
//! read-only afterwards. The engine never mutates it.

/// A single column's metadata.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    is_auto_increment: bool,
    is_random_id: bool,
    is_deleted: bool,
    is_created: bool,
    is_updated: bool,
    is_version: bool,
    nullable: bool,
}

impl Column {
    /// Creates a plain column with no flags set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_auto_increment: false,
            is_random_id: false,
            is_deleted: false,
            is_created: false,
            is_updated: false,
            is_version: false,
            nullable: false,
        }
    }

    /// Marks the column as populated by the store's native auto-increment or
    /// by an external sequence.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }

    /// Marks the column as populated by the distributed id generator.
    #[must_use]
    pub const fn random_id(mut self) -> Self {
        self.is_random_id = true;
        self
    }

    /// Marks the column as a soft-delete marker, never written on insert.
    #[must_use]
    pub const fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    /// Marks the column as a creation timestamp.
    #[must_use]
    pub const fn created(mut self) -> Self {
        self.is_created = true;
        self
    }

    /// Marks the column as a modification timestamp.
    #[must_use]
    pub const fn updated(mut self) -> Self {
        self.is_updated = true;
        self
    }

    /// Marks the column as the optimistic-locking version counter.
    #[must_use]
    pub const fn version(mut self) -> Self {
        self.is_version = true;
        self
    }

    /// Marks the column as nullable; a zero value binds NULL instead.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the column is an auto-increment column.
    #[must_use]
    pub const fn is_auto_increment(&self) -> bool {
        self.is_auto_increment
    }

    /// Whether the column is a random-id column.
    #[must_use]
    pub const fn is_random_id(&self) -> bool {
        self.is_random_id
    }

    /// Whether the column is a soft-delete marker.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Whether the column is a creation timestamp.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        self.is_created
    }

    /// Whether the column is a modification timestamp.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        self.is_updated
    }

    /// Whether the column is the version counter.
    #[must_use]
    pub const fn is_version(&self) -> bool {
        self.is_version
    }

    /// Whether the column is nullable.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Immutable table metadata: ordered columns plus the designated generated
/// and version column names.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    auto_increment: Option<String>,
    random_id: Option<String>,
    version: Option<String>,
}

impl Table {
    /// Starts building a table definition.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Name of the auto-increment column, when one is designated.
    #[must_use]
    pub fn auto_increment(&self) -> Option<&str> {
        self.auto_increment.as_deref()
    }

    /// Name of the random-id column, when one is designated.
    #[must_use]
    pub fn random_id(&self) -> Option<&str> {
        self.random_id.as_deref()
    }

    /// Name of the version column, when one is designated.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Builder for [`Table`] metadata.
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Appends a column. Declaration order is preserved in generated SQL.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Finalizes the table, deriving the designated auto-increment, random-id,
    /// and version column names from the column flags. The first flagged
    /// column wins when several carry the same flag.
    #[must_use]
    pub fn build(self) -> Table {
        let find = |pred: fn(&Column) -> bool| {
            self.columns.iter().find(|col| pred(col)).map(|col| col.name.clone())
        };

        Table {
            auto_increment: find(Column::is_auto_increment),
            random_id: find(Column::is_random_id),
            version: find(Column::is_version),
            name: self.name,
            columns: self.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_derives_designated_columns() {
        let table = Table::builder("users")
            .column(Column::new("id").auto_increment())
            .column(Column::new("name"))
            .column(Column::new("version").version())
            .build();

        assert_eq!(table.auto_increment(), Some("id"));
        assert_eq!(table.random_id(), None);
        assert_eq!(table.version(), Some("version"));
        assert_eq!(table.columns().len(), 3);
        assert!(table.column("name").is_some());
        assert!(table.column("missing").is_none());
    }
}
