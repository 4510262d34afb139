//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for the
//! `objinfo` binary.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run` function
//! - **Carries context** (configuration directories and the loaded
//!   [`ObjectInfoConfig`]) so callers don't thread it through every call
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no projection or deletion logic of its own.
//! Library users embedding the crate in their own host usually skip this
//! layer and call [`crate::projector`], [`crate::soft_delete`] and
//! [`crate::columns`] directly.

use crate::columns::OperationColumnOptions;
use crate::commands;
use crate::config::ObjectInfoConfig;
use crate::error::Result;
use crate::projector::ProjectionConfig;
use crate::soft_delete::DeleteOptions;
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::project::ProjectOverrides;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, ObjectInfoPaths, Scope};

pub struct ObjectInfoApi {
    paths: ObjectInfoPaths,
    config: ObjectInfoConfig,
}

impl ObjectInfoApi {
    pub fn new(paths: ObjectInfoPaths, config: ObjectInfoConfig) -> Self {
        Self { paths, config }
    }

    pub fn paths(&self) -> &ObjectInfoPaths {
        &self.paths
    }

    pub fn config_ref(&self) -> &ObjectInfoConfig {
        &self.config
    }

    /// Project a JSON record. `projection_file` replaces the default
    /// (empty) projection configuration.
    pub fn project(
        &self,
        record: &Path,
        projection_file: Option<&Path>,
        overrides: ProjectOverrides,
    ) -> Result<CmdResult> {
        let projection = match projection_file {
            Some(path) => commands::project::load_projection(path)?,
            None => ProjectionConfig::new(),
        };
        commands::project::run(record, projection, overrides, &self.config)
    }

    pub fn soft_delete(
        &self,
        record: &Path,
        options: &DeleteOptions,
        strict: bool,
    ) -> Result<CmdResult> {
        commands::soft_delete::run(record, options, strict, &self.config)
    }

    pub fn generate_operations(&self, operations: &[String]) -> Result<CmdResult> {
        commands::columns::generate(operations)
    }

    pub fn operation_columns(
        &self,
        stems: &[String],
        options: &OperationColumnOptions,
    ) -> Result<CmdResult> {
        commands::columns::operation(stems, options)
    }

    pub fn config(&self, scope: Scope, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, scope, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn api(dir: &TempDir, config: ObjectInfoConfig) -> ObjectInfoApi {
        ObjectInfoApi::new(
            ObjectInfoPaths {
                project: Some(dir.path().join(".objinfo")),
                global: dir.path().join("global"),
            },
            config,
        )
    }

    #[test]
    fn project_uses_loaded_config() {
        let dir = TempDir::new().unwrap();
        let record = dir.path().join("record.json");
        fs::write(&record, json!({"id": 1, "removed": 0}).to_string()).unwrap();

        let mut config = ObjectInfoConfig::default();
        config.set_delete_column("removed").unwrap();
        let result = api(&dir, config)
            .project(&record, None, ProjectOverrides::default())
            .unwrap();

        let info = result.info.unwrap();
        assert_eq!(info.get("id"), Some(&Value::Int(1)));
        assert!(!info.contains_key("removed"));
    }

    #[test]
    fn project_reads_projection_file() {
        let dir = TempDir::new().unwrap();
        let record = dir.path().join("record.json");
        fs::write(&record, json!({"id": 1, "name": "n"}).to_string()).unwrap();
        let projection = dir.path().join("projection.json");
        fs::write(&projection, json!({"only": ["name"]}).to_string()).unwrap();

        let result = api(&dir, ObjectInfoConfig::default())
            .project(&record, Some(&projection), ProjectOverrides::default())
            .unwrap();
        let info = result.info.unwrap();
        assert_eq!(info.keys().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn columns_dispatch() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir, ObjectInfoConfig::default());
        assert_eq!(api.generate_operations(&[]).unwrap().columns.len(), 7);
        assert_eq!(
            api.operation_columns(&["x".to_string()], &OperationColumnOptions::default())
                .unwrap()
                .columns
                .len(),
            2
        );
    }

    #[test]
    fn config_dispatch_uses_paths() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir, ObjectInfoConfig::default());
        api.config(
            Scope::Project,
            ConfigAction::Set("datetime-format".into(), "min".into()),
        )
        .unwrap();
        assert!(dir.path().join(".objinfo").join("config.json").exists());
    }
}
