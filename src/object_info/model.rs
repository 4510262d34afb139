//! # Host Capabilities
//!
//! The crate never owns records, tables or migrations. It works against a
//! host ORM through the small capability traits defined here:
//!
//! | Trait | Used by | What the host provides |
//! |-------|---------|------------------------|
//! | [`Readable`] | projector | attribute enumeration and reads, zero-argument methods |
//! | [`Writable`] | soft delete | attribute presence checks and writes |
//! | [`Persistable`] | soft delete | a non-raising and a raising save |
//! | [`ModelSchema`] | soft delete | column introspection and default scopes |
//! | [`SchemaBuilder`] | column generator | column declarations inside a migration |
//!
//! [`crate::store`] ships in-memory and JSON-file implementations that the CLI
//! and the tests use.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record whose attributes can be enumerated and read by name.
pub trait Readable {
    /// Every attribute name of the record, in declaration order.
    fn attribute_names(&self) -> Vec<String>;

    /// Read an attribute. Unknown names read as [`Value::Null`].
    fn read_attribute(&self, name: &str) -> Value;

    /// Invoke a zero-argument method on the record.
    ///
    /// Records without computed methods can rely on the default, which
    /// reads the attribute of the same name.
    fn call_method(&self, name: &str) -> Value {
        self.read_attribute(name)
    }
}

/// A record whose attributes can be assigned.
pub trait Writable: Readable {
    /// Whether the record responds to `name` (has that attribute).
    fn has_attribute(&self, name: &str) -> bool;

    fn write_attribute(&mut self, name: &str, value: Value);
}

/// Options forwarded to the host save operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Whether the host should refresh its "touched" timestamp.
    ///
    /// `None` is passed through untouched so the host default applies.
    pub touch: Option<bool>,
}

impl SaveOptions {
    pub fn touch(touch: Option<bool>) -> Self {
        Self { touch }
    }
}

/// A record that can be saved by the host framework.
pub trait Persistable {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Non-raising save. Failures are reported as `false`.
    fn save(&mut self, options: SaveOptions) -> bool;

    /// Raising save. Failures are returned to the caller unchanged.
    fn save_strict(&mut self, options: SaveOptions) -> Result<(), Self::Error>;
}

/// A restricting predicate applied to every default query of a model type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultScope {
    pub field: String,
    pub value: Value,
}

impl DefaultScope {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether a record passes this scope.
    pub fn matches<R: Readable + ?Sized>(&self, record: &R) -> bool {
        record.read_attribute(&self.field) == self.value
    }
}

/// The type-level side of a model: its declared columns and default scopes.
pub trait ModelSchema {
    fn has_column(&self, name: &str) -> bool;

    fn add_default_scope(&mut self, scope: DefaultScope);
}

/// Column types the column generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    BigInt,
    DateTime,
    Integer,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::BigInt => "bigint",
            ColumnType::DateTime => "datetime",
            ColumnType::Integer => "integer",
        };
        f.write_str(name)
    }
}

/// Options attached to a column declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ColumnOptions {
    pub fn indexed(mut self) -> Self {
        self.index = Some(true);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// The migration DSL of the host framework.
pub trait SchemaBuilder {
    fn column(&mut self, name: &str, kind: ColumnType, options: ColumnOptions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Row(BTreeMap<String, Value>);

    impl Readable for Row {
        fn attribute_names(&self) -> Vec<String> {
            self.0.keys().cloned().collect()
        }

        fn read_attribute(&self, name: &str) -> Value {
            self.0.get(name).cloned().unwrap_or_default()
        }
    }

    #[test]
    fn call_method_defaults_to_attribute_read() {
        let row = Row(BTreeMap::from([("id".to_string(), Value::Int(7))]));
        assert_eq!(row.call_method("id"), Value::Int(7));
        assert_eq!(row.call_method("missing"), Value::Null);
    }

    #[test]
    fn default_scope_matches_on_equality() {
        let scope = DefaultScope::new("deleted", 0);
        let active = Row(BTreeMap::from([("deleted".to_string(), Value::Int(0))]));
        let deleted = Row(BTreeMap::from([("deleted".to_string(), Value::Int(1))]));

        assert!(scope.matches(&active));
        assert!(!scope.matches(&deleted));
    }

    #[test]
    fn column_options_builder() {
        let options = ColumnOptions::default().indexed().comment("operator");
        assert_eq!(options.index, Some(true));
        assert_eq!(options.comment.as_deref(), Some("operator"));
        assert_eq!(options.default, None);
    }

    #[test]
    fn column_type_names() {
        assert_eq!(ColumnType::BigInt.to_string(), "bigint");
        assert_eq!(ColumnType::DateTime.to_string(), "datetime");
        assert_eq!(ColumnType::Integer.to_string(), "integer");
        assert_eq!(
            serde_json::to_string(&ColumnType::BigInt).unwrap(),
            "\"bigint\""
        );
    }
}
