//! # Soft Deletion
//!
//! Marks records as logically deleted instead of removing them.
//!
//! A [`SoftDelete`] handle is created once per model type with
//! [`SoftDelete::attach`], which resolves the deletion constants and, when the
//! model declares the deletion column, registers a default scope that hides
//! deleted rows from default queries.
//!
//! ## Lifecycle
//!
//! ```text
//! ACTIVE (field == valid_value) ──soft_delete──▶ DELETED (field == invalid_value)
//! ```
//!
//! There is no restore transition; `DELETED` is terminal here.
//!
//! ## Operations
//!
//! - [`SoftDelete::delete_block`]: mutate the record in memory only.
//! - [`SoftDelete::soft_delete`]: `delete_block`, then the host's non-raising save.
//! - [`SoftDelete::soft_delete_strict`]: `delete_block`, then the raising save;
//!   host failures propagate.
//!
//! `delete_block` fails without a user id or without the deletion field.
//! `soft_delete` and `soft_delete_strict` first return
//! [`SoftDeleteOutcome::Skipped`] for records lacking the deletion field;
//! otherwise they fail without a user id as well.

use crate::error::{ObjectInfoError, Result};
use crate::model::{DefaultScope, ModelSchema, Persistable, Readable, SaveOptions, Writable};
use crate::value::Value;
use chrono::Local;
use serde::{Deserialize, Serialize};

pub const MISSING_USER_ID: &str = "Must give user id!";

pub const DEFAULT_DELETED_FIELD: &str = "deleted";
pub const DEFAULT_UPDATED_BY_FIELD: &str = "updated_by";
pub const DEFAULT_DELETED_BY_FIELD: &str = "deleted_by";
pub const DEFAULT_DELETED_AT_FIELD: &str = "deleted_at";

fn default_field() -> String {
    DEFAULT_DELETED_FIELD.to_string()
}

fn default_valid_value() -> Value {
    Value::Int(0)
}

fn default_invalid_value() -> Value {
    Value::Int(1)
}

/// Per-model deletion constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftDeleteConfig {
    /// Name of the deletion flag column.
    #[serde(default = "default_field")]
    pub field: String,

    /// Flag value of live rows.
    #[serde(default = "default_valid_value")]
    pub valid_value: Value,

    /// Flag value of deleted rows.
    #[serde(default = "default_invalid_value")]
    pub invalid_value: Value,
}

impl Default for SoftDeleteConfig {
    fn default() -> Self {
        Self {
            field: default_field(),
            valid_value: default_valid_value(),
            invalid_value: default_invalid_value(),
        }
    }
}

/// Arguments of a soft delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub user_id: Value,
    /// Also stamp `updated_by` and ask the host to touch the record.
    /// `None` is forwarded to the host as-is.
    pub refresh_updated: Option<bool>,
    pub updated_by_field: Option<String>,
    pub deleted_by_field: Option<String>,
    pub deleted_at_field: Option<String>,
}

impl DeleteOptions {
    /// Options for a delete performed by `user_id`.
    pub fn by(user_id: impl Into<Value>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn refresh_updated(mut self, refresh: bool) -> Self {
        self.refresh_updated = Some(refresh);
        self
    }

    pub fn updated_by_field(mut self, field: impl Into<String>) -> Self {
        self.updated_by_field = Some(field.into());
        self
    }

    pub fn deleted_by_field(mut self, field: impl Into<String>) -> Self {
        self.deleted_by_field = Some(field.into());
        self
    }

    pub fn deleted_at_field(mut self, field: impl Into<String>) -> Self {
        self.deleted_at_field = Some(field.into());
        self
    }

    fn updated_by(&self) -> &str {
        self.updated_by_field
            .as_deref()
            .unwrap_or(DEFAULT_UPDATED_BY_FIELD)
    }

    fn deleted_by(&self) -> &str {
        self.deleted_by_field
            .as_deref()
            .unwrap_or(DEFAULT_DELETED_BY_FIELD)
    }

    fn deleted_at(&self) -> &str {
        self.deleted_at_field
            .as_deref()
            .unwrap_or(DEFAULT_DELETED_AT_FIELD)
    }
}

/// Result of a soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeleteOutcome {
    /// The record has no deletion field; nothing happened.
    Skipped,
    Saved,
    /// Marked deleted in memory but the non-raising save reported failure.
    NotSaved,
}

/// Soft-delete behavior bound to one model type.
#[derive(Debug, Clone)]
pub struct SoftDelete {
    config: SoftDeleteConfig,
}

impl SoftDelete {
    /// Attach soft deletion to a model type.
    ///
    /// Registers `field == valid_value` as a default scope when the model
    /// declares `field`.
    pub fn attach<M: ModelSchema>(model: &mut M, config: SoftDeleteConfig) -> Self {
        let handle = Self { config };
        if model.has_column(&handle.config.field) {
            model.add_default_scope(handle.default_scope());
        } else {
            tracing::debug!(field = %handle.config.field, "model has no deletion column, no default scope");
        }
        handle
    }

    pub fn config(&self) -> &SoftDeleteConfig {
        &self.config
    }

    /// The predicate selecting live rows.
    pub fn default_scope(&self) -> DefaultScope {
        DefaultScope::new(self.config.field.clone(), self.config.valid_value.clone())
    }

    pub fn is_deleted<R: Readable>(&self, record: &R) -> bool {
        record.read_attribute(&self.config.field) == self.config.invalid_value
    }

    /// Mark `record` deleted in memory. Nothing is persisted.
    ///
    /// Fails with [`ObjectInfoError::Record`] when the record has no deletion
    /// field; the record is left untouched.
    pub fn delete_block<R: Writable>(&self, record: &mut R, options: &DeleteOptions) -> Result<()> {
        if options.user_id.is_blank() {
            return Err(ObjectInfoError::Argument(MISSING_USER_ID.to_string()));
        }
        if !record.has_attribute(&self.config.field) {
            return Err(ObjectInfoError::Record(format!(
                "record has no `{}` attribute",
                self.config.field
            )));
        }

        record.write_attribute(&self.config.field, self.config.invalid_value.clone());

        let deleted_by = options.deleted_by();
        if record.has_attribute(deleted_by) {
            record.write_attribute(deleted_by, options.user_id.clone());
        }

        let deleted_at = options.deleted_at();
        if record.has_attribute(deleted_at) {
            record.write_attribute(deleted_at, Value::DateTime(Local::now().naive_local()));
        }

        let updated_by = options.updated_by();
        if options.refresh_updated.unwrap_or(false) && record.has_attribute(updated_by) {
            record.write_attribute(updated_by, options.user_id.clone());
        }

        tracing::debug!(user_id = %options.user_id, field = %self.config.field, "record marked deleted");
        Ok(())
    }

    /// Mark deleted, then save through the host's non-raising path.
    pub fn soft_delete<R>(&self, record: &mut R, options: &DeleteOptions) -> Result<SoftDeleteOutcome>
    where
        R: Writable + Persistable,
    {
        if !record.has_attribute(&self.config.field) {
            return Ok(SoftDeleteOutcome::Skipped);
        }
        self.delete_block(record, options)?;

        if record.save(SaveOptions::touch(options.refresh_updated)) {
            Ok(SoftDeleteOutcome::Saved)
        } else {
            Ok(SoftDeleteOutcome::NotSaved)
        }
    }

    /// Mark deleted, then save through the host's raising path.
    ///
    /// A host failure is returned as [`ObjectInfoError::Persistence`] carrying
    /// the host's error as its source.
    pub fn soft_delete_strict<R>(
        &self,
        record: &mut R,
        options: &DeleteOptions,
    ) -> Result<SoftDeleteOutcome>
    where
        R: Writable + Persistable,
    {
        if !record.has_attribute(&self.config.field) {
            return Ok(SoftDeleteOutcome::Skipped);
        }
        self.delete_block(record, options)?;

        record
            .save_strict(SaveOptions::touch(options.refresh_updated))
            .map_err(ObjectInfoError::persistence)?;
        Ok(SoftDeleteOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{audited_record, flag_only_record, untracked_record};
    use crate::store::memory::{MemoryModel, SaveMethod};
    use crate::store::StoreError;

    fn handle() -> SoftDelete {
        let mut model = MemoryModel::new(["id", "deleted"]);
        SoftDelete::attach(&mut model, SoftDeleteConfig::default())
    }

    #[test]
    fn attach_registers_scope_only_when_column_exists() {
        let mut with_column = MemoryModel::new(["id", "deleted"]);
        SoftDelete::attach(&mut with_column, SoftDeleteConfig::default());
        assert_eq!(
            with_column.default_scopes(),
            &[DefaultScope::new("deleted", 0)]
        );

        let mut without_column = MemoryModel::new(["id"]);
        SoftDelete::attach(&mut without_column, SoftDeleteConfig::default());
        assert!(without_column.default_scopes().is_empty());
    }

    #[test]
    fn attach_uses_custom_constants() {
        let mut model = MemoryModel::new(["removed"]);
        let config = SoftDeleteConfig {
            field: "removed".into(),
            valid_value: Value::from("no"),
            invalid_value: Value::from("yes"),
        };
        let handle = SoftDelete::attach(&mut model, config);
        assert_eq!(model.default_scopes(), &[DefaultScope::new("removed", "no")]);

        let mut record = untracked_record().with("removed", "no");
        handle
            .soft_delete(&mut record, &DeleteOptions::by(5))
            .unwrap();
        assert_eq!(record.read_attribute("removed"), Value::from("yes"));
    }

    #[test]
    fn soft_delete_with_user_id() {
        let mut record = audited_record();
        let updated_at = record.read_attribute("updated_at");

        let outcome = handle()
            .soft_delete(&mut record, &DeleteOptions::by(1234))
            .unwrap();

        assert_eq!(outcome, SoftDeleteOutcome::Saved);
        let call = record.last_save().unwrap();
        assert_eq!(call.method, SaveMethod::Save);
        assert_eq!(call.options, SaveOptions::touch(None));
        assert_eq!(record.read_attribute("deleted"), Value::Int(1));
        assert_eq!(record.read_attribute("deleted_by"), Value::Int(1234));
        assert!(matches!(record.read_attribute("deleted_at"), Value::DateTime(_)));
        assert_eq!(record.read_attribute("updated_by"), Value::Int(1));
        assert_eq!(record.read_attribute("updated_at"), updated_at);
    }

    #[test]
    fn explicit_no_refresh_forwards_false() {
        let mut record = audited_record();
        handle()
            .soft_delete(&mut record, &DeleteOptions::by(1234).refresh_updated(false))
            .unwrap();

        assert_eq!(
            record.last_save().unwrap().options,
            SaveOptions::touch(Some(false))
        );
        assert_eq!(record.read_attribute("updated_by"), Value::Int(1));
        assert!(
            record.read_attribute("updated_at").as_datetime()
                < record.read_attribute("deleted_at").as_datetime()
        );
    }

    #[test]
    fn refresh_updated_stamps_updater_and_touches() {
        let mut record = audited_record();
        let old_updated_at = record.read_attribute("updated_at").as_datetime();

        handle()
            .soft_delete(&mut record, &DeleteOptions::by(1234).refresh_updated(true))
            .unwrap();

        assert_eq!(
            record.last_save().unwrap().options,
            SaveOptions::touch(Some(true))
        );
        assert_eq!(record.read_attribute("updated_by"), Value::Int(1234));
        assert!(record.read_attribute("updated_at").as_datetime() > old_updated_at);
    }

    #[test]
    fn record_without_metadata_columns_only_flips_flag() {
        let mut record = flag_only_record();
        let old_updated_at = record.read_attribute("updated_at").as_datetime();

        handle()
            .soft_delete(&mut record, &DeleteOptions::by(1234).refresh_updated(true))
            .unwrap();

        assert_eq!(record.read_attribute("deleted"), Value::Int(1));
        assert!(!record.has_attribute("deleted_by"));
        assert!(!record.has_attribute("deleted_at"));
        assert!(!record.has_attribute("updated_by"));
        assert!(record.read_attribute("updated_at").as_datetime() > old_updated_at);
    }

    #[test]
    fn missing_user_id_fails_without_mutation() {
        for user_id in [Value::Null, Value::from(""), Value::from("  ")] {
            let mut record = audited_record();
            let before = record.clone();
            let options = DeleteOptions {
                user_id,
                ..Default::default()
            };

            let err = handle().soft_delete(&mut record, &options).unwrap_err();
            assert!(matches!(err, ObjectInfoError::Argument(ref m) if m == MISSING_USER_ID));
            assert_eq!(err.to_string(), "Must give user id!");
            assert_eq!(record, before);
        }
    }

    #[test]
    fn record_without_deletion_field_is_skipped() {
        let mut record = untracked_record();
        let outcome = handle()
            .soft_delete(&mut record, &DeleteOptions::default())
            .unwrap();

        assert_eq!(outcome, SoftDeleteOutcome::Skipped);
        assert!(record.saves().is_empty());
    }

    #[test]
    fn delete_block_does_not_save() {
        let mut record = audited_record();
        handle()
            .delete_block(&mut record, &DeleteOptions::by(9))
            .unwrap();

        assert_eq!(record.read_attribute("deleted"), Value::Int(1));
        assert!(record.saves().is_empty());
    }

    #[test]
    fn delete_block_requires_deletion_field() {
        let mut record = untracked_record();
        let before = record.clone();

        let err = handle()
            .delete_block(&mut record, &DeleteOptions::by(9))
            .unwrap_err();

        assert!(matches!(err, ObjectInfoError::Record(ref m) if m.contains("deleted")));
        assert!(!record.has_attribute("deleted"));
        assert_eq!(record, before);
    }

    #[test]
    fn delete_block_honors_custom_field_names() {
        let mut record = untracked_record()
            .with("deleted", 0)
            .with("removed_by", Value::Null)
            .with("removed_at", Value::Null)
            .with("editor", Value::Null);
        let options = DeleteOptions::by(42)
            .refresh_updated(true)
            .deleted_by_field("removed_by")
            .deleted_at_field("removed_at")
            .updated_by_field("editor");

        handle().delete_block(&mut record, &options).unwrap();

        assert_eq!(record.read_attribute("removed_by"), Value::Int(42));
        assert!(record.read_attribute("removed_at").is_temporal());
        assert_eq!(record.read_attribute("editor"), Value::Int(42));
    }

    #[test]
    fn non_raising_save_failure_is_reported_not_raised() {
        let mut record = audited_record().rejecting_saves("locked");
        let outcome = handle()
            .soft_delete(&mut record, &DeleteOptions::by(1))
            .unwrap();
        assert_eq!(outcome, SoftDeleteOutcome::NotSaved);
        assert_eq!(record.read_attribute("deleted"), Value::Int(1));
    }

    #[test]
    fn strict_uses_raising_save() {
        let mut record = audited_record();
        let outcome = handle()
            .soft_delete_strict(&mut record, &DeleteOptions::by(1234))
            .unwrap();

        assert_eq!(outcome, SoftDeleteOutcome::Saved);
        let call = record.last_save().unwrap();
        assert_eq!(call.method, SaveMethod::SaveStrict);
        assert_eq!(call.options, SaveOptions::touch(None));
        assert_eq!(record.read_attribute("deleted_by"), Value::Int(1234));
    }

    #[test]
    fn strict_propagates_host_failure() {
        let mut record = audited_record().rejecting_saves("locked");
        let err = handle()
            .soft_delete_strict(&mut record, &DeleteOptions::by(1))
            .unwrap_err();

        let ObjectInfoError::Persistence(source) = err else {
            panic!("Expected Persistence error");
        };
        let host = source.downcast_ref::<StoreError>().unwrap();
        assert!(matches!(host, StoreError::Rejected(r) if r == "locked"));
    }

    #[test]
    fn is_deleted_tracks_state() {
        let handle = handle();
        let mut record = audited_record();
        assert!(!handle.is_deleted(&record));
        handle
            .soft_delete(&mut record, &DeleteOptions::by(1))
            .unwrap();
        assert!(handle.is_deleted(&record));
    }

    #[test]
    fn default_scope_hides_deleted_rows() {
        let mut model = MemoryModel::new(["id", "deleted"]);
        let handle = SoftDelete::attach(&mut model, SoftDeleteConfig::default());
        let first = model.insert(audited_record());
        model.insert(audited_record());

        let record = model.record_mut(first).unwrap();
        handle.soft_delete(record, &DeleteOptions::by(1)).unwrap();

        assert_eq!(model.all().len(), 1);
        assert_eq!(model.unscoped().len(), 2);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SoftDeleteConfig = serde_json::from_str(r#"{"field": "removed"}"#).unwrap();
        assert_eq!(config.field, "removed");
        assert_eq!(config.valid_value, Value::Int(0));
        assert_eq!(config.invalid_value, Value::Int(1));
    }
}
