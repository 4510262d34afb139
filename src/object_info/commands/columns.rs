use crate::columns::{generate_operations, operation_columns, OperationColumnOptions, TableDefinition};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

/// Audit columns for whole operations (`created`, `updated`, `deleted` by
/// default).
pub fn generate(operations: &[String]) -> Result<CmdResult> {
    let mut table = TableDefinition::new();
    generate_operations(&mut table, operations);
    Ok(finish(table))
}

/// Operator/timestamp columns for arbitrary stems.
pub fn operation(stems: &[String], options: &OperationColumnOptions) -> Result<CmdResult> {
    let mut table = TableDefinition::new();
    operation_columns(&mut table, stems, options);
    Ok(finish(table))
}

fn finish(table: TableDefinition) -> CmdResult {
    let columns = table.into_columns();
    let mut result = CmdResult::default();
    if columns.is_empty() {
        result.add_message(CmdMessage::warning("No columns generated"));
    }
    result.with_columns(columns)
}
