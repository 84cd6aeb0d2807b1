use crate::error::Result;
use crate::value::Value;

/// Mutation hooks a record type advertises.
///
/// Capabilities are declared explicitly rather than probed through dynamic
/// casting; the engine queries them once per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookCapability {
    /// The record wants [`Record::before_insert`] invoked.
    pub before_insert: bool,
    /// The record wants [`Record::after_insert`] invoked.
    pub after_insert: bool,
}

impl HookCapability {
    /// Capability set with both insert hooks enabled.
    pub const INSERT_HOOKS: Self = Self {
        before_insert: true,
        after_insert: true,
    };
}

/// A record instance being persisted.
///
/// Access is by column name through an explicit accessor table, generated by
/// the [`record!`](crate::record!) macro or implemented by hand. This replaces
/// runtime type introspection: a record type either knows a column or reports
/// a field-access error.
pub trait Record {
    /// Reads the current value of `column`.
    ///
    /// # Errors
    ///
    /// Returns a field-access error when the column is not part of this
    /// record type.
    fn get(&self, column: &str) -> Result<Value>;

    /// Writes `value` into `column`, converting to the field's type.
    ///
    /// # Errors
    ///
    /// Returns a field-access error when the column is unknown or the value
    /// cannot be converted to the field type.
    fn set(&mut self, column: &str, value: Value) -> Result<()>;

    /// Hooks this record type participates in. Defaults to none.
    fn hook_capability(&self) -> HookCapability {
        HookCapability::default()
    }

    /// Invoked before the insert statement executes, when advertised.
    fn before_insert(&mut self) {}

    /// Invoked after the insert completes (or at deferred replay when a
    /// transaction is pending), when advertised.
    fn after_insert(&mut self) {}
}

/// Declares a persistable record with a generated [`Record`] accessor table.
///
/// Every field type must convert into [`Value`] and implement
/// [`FromValue`](crate::FromValue) for write-back.
///
/// # Examples
///
/// ```ignore
/// record! {
///     table = "users",
///     #[derive(Debug, Clone, Default)]
///     pub struct User {
///         pub id: i64,
///         pub name: String,
///         pub active: bool,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        table = $table:literal,
        $(#[$meta:meta])*
        pub struct $struct_name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field_name:ident : $field_type:ty
            ),* $(,)?
        }
    ) => {
        #[allow(missing_docs)]
        $(#[$meta])*
        pub struct $struct_name {
            $(
                $(#[$field_meta])*
                pub $field_name : $field_type
            ),*
        }

        impl $struct_name {
            /// The database table name for this record type.
            pub const TABLE: &'static str = $table;
        }

        impl $crate::Record for $struct_name {
            fn get(&self, column: &str) -> $crate::Result<$crate::Value> {
                match column {
                    $(
                        stringify!($field_name) => Ok(self.$field_name.clone().into()),
                    )*
                    _ => Err($crate::Error::FieldAccess {
                        column: column.to_string(),
                        reason: concat!("not a column of ", stringify!($struct_name)).to_string(),
                    }),
                }
            }

            fn set(&mut self, column: &str, value: $crate::Value) -> $crate::Result<()> {
                match column {
                    $(
                        stringify!($field_name) => {
                            self.$field_name =
                                <$field_type as $crate::FromValue>::from_value(column, value)?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::Error::FieldAccess {
                        column: column.to_string(),
                        reason: concat!("not a column of ", stringify!($struct_name)).to_string(),
                    }),
                }
            }
        }
    };
}
