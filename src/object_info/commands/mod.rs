//! # Command Layer
//!
//! One module per CLI action. Each `run` function does the work and returns
//! a [`CmdResult`]: structured data plus user-facing [`CmdMessage`]s. Nothing
//! here prints; presentation belongs to the binary.

use crate::columns::ColumnDeclaration;
use crate::config::ObjectInfoConfig;
use crate::error::{ObjectInfoError, Result};
use crate::projector::InstanceInfo;
use crate::soft_delete::SoftDeleteOutcome;
use crate::store::fs::JsonFileRecord;
use std::path::{Path, PathBuf};

pub mod columns;
pub mod config;
pub mod project;
pub mod soft_delete;

/// Which configuration directory a command works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Project,
    Global,
}

#[derive(Debug, Clone)]
pub struct ObjectInfoPaths {
    pub project: Option<PathBuf>,
    pub global: PathBuf,
}

impl ObjectInfoPaths {
    pub fn scope_dir(&self, scope: Scope) -> Result<PathBuf> {
        match scope {
            Scope::Project => self
                .project
                .clone()
                .ok_or_else(|| ObjectInfoError::Config("Project scope is not available".to_string())),
            Scope::Global => Ok(self.global.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub info: Option<InstanceInfo>,
    pub record: Option<serde_json::Value>,
    pub outcome: Option<SoftDeleteOutcome>,
    pub columns: Vec<ColumnDeclaration>,
    pub config: Option<ObjectInfoConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_info(mut self, info: InstanceInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_record(mut self, record: serde_json::Value) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_outcome(mut self, outcome: SoftDeleteOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDeclaration>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_config(mut self, config: ObjectInfoConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Load a JSON record file, naming the file in the error.
pub(crate) fn load_record(path: &Path) -> Result<JsonFileRecord> {
    JsonFileRecord::load(path)
        .map_err(|e| ObjectInfoError::Record(format!("{}: {}", path.display(), e)))
}
