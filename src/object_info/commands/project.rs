use crate::commands::{load_record, CmdMessage, CmdResult};
use crate::config::ObjectInfoConfig;
use crate::error::{ObjectInfoError, Result};
use crate::projector::{project, ProjectionConfig};
use std::fs;
use std::path::Path;

/// Command-line overrides applied on top of a projection file.
#[derive(Debug, Clone, Default)]
pub struct ProjectOverrides {
    pub only: Option<Vec<String>>,
    pub except: Option<Vec<String>>,
    pub datetime_format: Option<String>,
}

/// Read a [`ProjectionConfig`] from a JSON file.
pub fn load_projection(path: &Path) -> Result<ProjectionConfig> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ObjectInfoError::Config(format!("{}: {}", path.display(), e)))
}

pub fn run(
    record_path: &Path,
    projection: ProjectionConfig,
    overrides: ProjectOverrides,
    config: &ObjectInfoConfig,
) -> Result<CmdResult> {
    let record = load_record(record_path)?;

    let mut projection = projection;
    if let Some(only) = overrides.only {
        projection.only = only;
    }
    if let Some(except) = overrides.except {
        projection.except = Some(except);
    }
    if let Some(format) = overrides.datetime_format {
        projection.datetime_format = Some(format);
    }
    let projection = config.apply_to(projection);

    let info = project(&record, &projection);
    let mut result = CmdResult::default();
    if info.is_empty() {
        result.add_message(CmdMessage::warning("Projection produced no attributes"));
    }
    Ok(result.with_info(info))
}
