//! # Instance Projection
//!
//! Turns a record into a plain key-value structure ready to be serialized
//! (typically to JSON for a front end), following a declarative
//! [`ProjectionConfig`].
//!
//! ## Selection
//!
//! The eligible attributes are the record's attribute names, intersected with
//! `only` when it is non-empty, minus `except`. `except` defaults to the
//! deletion-tracking triple derived from `delete_column` (`deleted`,
//! `deleted_by`, `deleted_at`).
//!
//! ## Output
//!
//! The `attributes` list, not the record, drives the output. For each entry:
//!
//! | Step | Rule |
//! |------|------|
//! | Normalize | bare names become descriptors; unsupported entries are skipped |
//! | Read | `abstract` entries read nothing; `method` entries call the method named by the **output key**; others read that key (`as`, else `name`) |
//! | Select | skip unless the output key is eligible or the entry is `abstract`/`method` |
//! | Filter | a present filter (callable, method, literal) produces the value |
//! | Format | otherwise date/time values are formatted (`full` by default) |
//!
//! Results are always stored under the **declared name**. Reading by output
//! key while writing by declared name means `{name: new_name, as: name}`
//! publishes the `name` attribute as `new_name`.
//!
//! When `attributes` is absent, every attribute name of the record is used
//! as a bare entry.

mod descriptor;
mod format;

pub use descriptor::{AttributeDescriptor, AttributeEntry, AttributeType, Filter, FilterFn};
pub use format::DateFormat;

use crate::model::Readable;
use crate::value::Value;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Default stem of the deletion-tracking columns.
pub const DEFAULT_DELETE_COLUMN: &str = "deleted";

/// Output of a projection.
pub type InstanceInfo = BTreeMap<String, Value>;

/// Declarative projection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectionConfig {
    /// Restrict output to these names. Empty means no restriction.
    #[serde(default)]
    pub only: Vec<String>,

    /// Always exclude these names. `None` means the deletion triple.
    #[serde(default)]
    pub except: Option<Vec<String>>,

    /// Ordered descriptors. `None` means every attribute of the record.
    #[serde(default)]
    pub attributes: Option<Vec<AttributeEntry>>,

    /// Fallback format for date/time values without a per-entry format.
    #[serde(default)]
    pub datetime_format: Option<String>,

    /// Stem for the default `except` triple.
    #[serde(default)]
    pub delete_column: Option<String>,
}

impl ProjectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn except<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn attributes<I, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<AttributeEntry>,
    {
        self.attributes = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = Some(format.into());
        self
    }

    pub fn delete_column(mut self, column: impl Into<String>) -> Self {
        self.delete_column = Some(column.into());
        self
    }

    /// The names excluded from the output.
    pub fn except_attributes(&self) -> Vec<String> {
        match &self.except {
            Some(except) => except.clone(),
            None => {
                let column = self
                    .delete_column
                    .as_deref()
                    .unwrap_or(DEFAULT_DELETE_COLUMN);
                vec![
                    column.to_string(),
                    format!("{}_by", column),
                    format!("{}_at", column),
                ]
            }
        }
    }

    /// Format for a date/time value: per-entry, then config-wide, then `full`.
    fn resolve_format(&self, descriptor: &AttributeDescriptor) -> DateFormat {
        descriptor
            .format
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .or_else(|| {
                self.datetime_format
                    .as_deref()
                    .filter(|f| !f.trim().is_empty())
            })
            .map(DateFormat::parse)
            .unwrap_or(DateFormat::Full)
    }
}

/// Project `instance` according to `config`.
pub fn project<R: Readable>(instance: &R, config: &ProjectionConfig) -> InstanceInfo {
    let except = config.except_attributes();
    let all_names = instance.attribute_names();

    let eligible: Vec<&String> = all_names
        .iter()
        .filter(|name| config.only.is_empty() || config.only.contains(name))
        .filter(|name| !except.contains(name))
        .collect();

    let implicit_entries: Vec<AttributeEntry>;
    let entries: &[AttributeEntry] = match &config.attributes {
        Some(entries) => entries,
        None => {
            implicit_entries = all_names.iter().cloned().map(AttributeEntry::Name).collect();
            &implicit_entries
        }
    };

    let mut result = InstanceInfo::new();
    for entry in entries {
        let Some(descriptor) = entry.descriptor() else {
            tracing::debug!(?entry, "skipping unsupported attribute entry");
            continue;
        };

        let output_key = descriptor.output_key();
        let raw = match descriptor.kind {
            Some(AttributeType::Abstract) => Value::Null,
            Some(AttributeType::Method) => instance.call_method(output_key),
            _ => instance.read_attribute(output_key),
        };

        let selected = eligible.iter().any(|name| name.as_str() == output_key);
        if !selected && !descriptor.bypasses_selection() {
            continue;
        }

        let value = match descriptor.present_filter() {
            Some(filter) => filter.apply(&raw, instance),
            None if raw.is_temporal() => config.resolve_format(&descriptor).apply(&raw),
            None => raw,
        };
        result.insert(descriptor.name.clone(), value);
    }

    result
}

/// `instance.instance_info(&config)` sugar for every readable record.
pub trait InstanceInfoExt: Readable + Sized {
    fn instance_info(&self, config: &ProjectionConfig) -> InstanceInfo {
        project(self, config)
    }
}

impl<R: Readable> InstanceInfoExt for R {}
