use crate::commands::{load_record, CmdMessage, CmdResult};
use crate::config::ObjectInfoConfig;
use crate::error::Result;
use crate::model::Readable;
use crate::soft_delete::{DeleteOptions, SoftDelete, SoftDeleteOutcome};
use crate::store::memory::MemoryModel;
use std::path::Path;

/// Soft-delete the record stored at `record_path` and write it back.
///
/// With `strict`, a failed write is an error; otherwise it is reported as a
/// message.
pub fn run(
    record_path: &Path,
    options: &DeleteOptions,
    strict: bool,
    config: &ObjectInfoConfig,
) -> Result<CmdResult> {
    let mut record = load_record(record_path)?;

    // The file's keys are its schema.
    let mut model = MemoryModel::new(record.attribute_names());
    let soft_delete = SoftDelete::attach(&mut model, config.soft_delete.clone());
    let field = soft_delete.config().field.clone();

    let mut result = CmdResult::default();
    if soft_delete.is_deleted(&record) {
        result.add_message(CmdMessage::info(format!(
            "Record was already marked deleted ({})",
            field
        )));
    }

    let outcome = if strict {
        soft_delete.soft_delete_strict(&mut record, options)?
    } else {
        soft_delete.soft_delete(&mut record, options)?
    };

    match outcome {
        SoftDeleteOutcome::Skipped => result.add_message(CmdMessage::warning(format!(
            "Record has no `{}` field, nothing to delete: {}",
            field,
            record_path.display()
        ))),
        SoftDeleteOutcome::Saved => result.add_message(CmdMessage::success(format!(
            "Record soft-deleted by {}: {}",
            options.user_id,
            record_path.display()
        ))),
        SoftDeleteOutcome::NotSaved => result.add_message(CmdMessage::error(format!(
            "Record marked deleted but could not be saved: {}",
            record_path.display()
        ))),
    }

    Ok(result.with_outcome(outcome).with_record(record.to_json()))
}
