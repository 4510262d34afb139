//! # Operation Columns
//!
//! Migration helpers emitting the audit columns of an operation: who did it
//! (`<stem>_by`, `bigint`) and when (`<stem>_at`, `datetime`).
//!
//! Both helpers drive any [`SchemaBuilder`]; [`TableDefinition`] is a
//! recording builder used by the CLI and the tests.

use crate::model::{ColumnOptions, ColumnType, SchemaBuilder};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPERATOR_COMMENT: &str = "operator";
pub const TIMESTAMP_COMMENT: &str = "operation timestamp";
pub const DELETION_FLAG_COMMENT: &str = "deletion flag";

/// Operations generated when none are given.
pub const DEFAULT_OPERATIONS: [&str; 3] = ["created", "updated", "deleted"];

/// Name of the operation that also gets a deletion flag column.
pub const DELETED_OPERATION: &str = "deleted";

/// Naming and selection options for [`operation_columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationColumnOptions {
    pub with_operator: bool,
    pub with_timestamp: bool,
    pub operator_prefix: String,
    pub operator_suffix: String,
    pub timestamp_prefix: String,
    pub timestamp_suffix: String,
}

impl Default for OperationColumnOptions {
    fn default() -> Self {
        Self {
            with_operator: true,
            with_timestamp: true,
            operator_prefix: String::new(),
            operator_suffix: "_by".to_string(),
            timestamp_prefix: String::new(),
            timestamp_suffix: "_at".to_string(),
        }
    }
}

impl OperationColumnOptions {
    pub fn operator_name(&self, stem: &str) -> String {
        format!("{}{}{}", self.operator_prefix, stem, self.operator_suffix)
    }

    pub fn timestamp_name(&self, stem: &str) -> String {
        format!("{}{}{}", self.timestamp_prefix, stem, self.timestamp_suffix)
    }
}

/// Declare the operator and timestamp columns of each stem, in order.
///
/// A computed name that is blank is not declared; the other column of the
/// same stem still is.
pub fn operation_columns<B, S>(builder: &mut B, stems: &[S], options: &OperationColumnOptions)
where
    B: SchemaBuilder + ?Sized,
    S: AsRef<str>,
{
    for stem in stems {
        let stem = stem.as_ref();

        if options.with_operator {
            let name = options.operator_name(stem);
            if !name.trim().is_empty() {
                builder.column(
                    &name,
                    ColumnType::BigInt,
                    ColumnOptions::default().indexed().comment(OPERATOR_COMMENT),
                );
            }
        }

        if options.with_timestamp {
            let name = options.timestamp_name(stem);
            if !name.trim().is_empty() {
                builder.column(
                    &name,
                    ColumnType::DateTime,
                    ColumnOptions::default().indexed().comment(TIMESTAMP_COMMENT),
                );
            }
        }
    }
}

/// Declare the audit columns of `operations` with default naming.
///
/// An empty list means `created`, `updated` and `deleted`. The `deleted`
/// operation (any case) is preceded by an integer deletion flag defaulting
/// to `0`.
pub fn generate_operations<B, S>(builder: &mut B, operations: &[S])
where
    B: SchemaBuilder + ?Sized,
    S: AsRef<str>,
{
    let names: Vec<&str> = if operations.is_empty() {
        DEFAULT_OPERATIONS.to_vec()
    } else {
        operations.iter().map(AsRef::as_ref).collect()
    };

    let options = OperationColumnOptions::default();
    for name in names {
        if name.eq_ignore_ascii_case(DELETED_OPERATION) {
            builder.column(
                name,
                ColumnType::Integer,
                ColumnOptions::default()
                    .default_value(0)
                    .comment(DELETION_FLAG_COMMENT),
            );
        }
        operation_columns(&mut *builder, &[name], &options);
    }
}

/// One recorded `column(name, type, options)` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(flatten)]
    pub options: ColumnOptions,
}

impl fmt::Display for ColumnDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind)?;
        if let Some(index) = self.options.index {
            write!(f, " index={}", index)?;
        }
        if let Some(default) = &self.options.default {
            match default {
                Value::Str(s) => write!(f, " default={:?}", s)?,
                other => write!(f, " default={}", other)?,
            }
        }
        if let Some(comment) = &self.options.comment {
            write!(f, " comment={:?}", comment)?;
        }
        Ok(())
    }
}

/// A [`SchemaBuilder`] that records every declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    columns: Vec<ColumnDeclaration>,
}

impl TableDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[ColumnDeclaration] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn into_columns(self) -> Vec<ColumnDeclaration> {
        self.columns
    }
}

impl SchemaBuilder for TableDefinition {
    fn column(&mut self, name: &str, kind: ColumnType, options: ColumnOptions) {
        self.columns.push(ColumnDeclaration {
            name: name.to_string(),
            kind,
            options,
        });
    }
}
