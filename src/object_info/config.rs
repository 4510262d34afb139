use crate::error::{ObjectInfoError, Result};
use crate::projector::{ProjectionConfig, DEFAULT_DELETE_COLUMN};
use crate::soft_delete::SoftDeleteConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Keys accepted by [`ObjectInfoConfig::get`] and [`ObjectInfoConfig::set`].
pub const CONFIG_KEYS: [&str; 3] = ["delete-column", "datetime-format", "deleted-field"];

/// Configuration for objinfo, stored in .objinfo/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectInfoConfig {
    /// Stem of the deletion columns hidden from projections
    #[serde(default = "default_delete_column")]
    pub delete_column: String,

    /// Fallback date/time format for projections (standard, full, min, date,
    /// year or a strftime pattern)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime_format: Option<String>,

    /// Deletion constants used by soft-delete
    #[serde(default)]
    pub soft_delete: SoftDeleteConfig,
}

fn default_delete_column() -> String {
    DEFAULT_DELETE_COLUMN.to_string()
}

impl Default for ObjectInfoConfig {
    fn default() -> Self {
        Self {
            delete_column: default_delete_column(),
            datetime_format: None,
            soft_delete: SoftDeleteConfig::default(),
        }
    }
}

impl ObjectInfoConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ObjectInfoConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "delete-column" => Some(self.delete_column.clone()),
            "datetime-format" => Some(self.datetime_format.clone().unwrap_or_default()),
            "deleted-field" => Some(self.soft_delete.field.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "delete-column" => self.set_delete_column(value),
            "datetime-format" => {
                self.set_datetime_format(value);
                Ok(())
            }
            "deleted-field" => self.set_deleted_field(value),
            other => Err(ObjectInfoError::Config(format!(
                "Unknown config key: {}",
                other
            ))),
        }
    }

    pub fn set_delete_column(&mut self, column: &str) -> Result<()> {
        let column = column.trim();
        if column.is_empty() {
            return Err(ObjectInfoError::Config(
                "delete-column cannot be empty".to_string(),
            ));
        }
        self.delete_column = column.to_string();
        Ok(())
    }

    /// An empty value clears the format.
    pub fn set_datetime_format(&mut self, format: &str) {
        let format = format.trim();
        self.datetime_format = if format.is_empty() {
            None
        } else {
            Some(format.to_string())
        };
    }

    pub fn set_deleted_field(&mut self, field: &str) -> Result<()> {
        let field = field.trim();
        if field.is_empty() {
            return Err(ObjectInfoError::Config(
                "deleted-field cannot be empty".to_string(),
            ));
        }
        self.soft_delete.field = field.to_string();
        Ok(())
    }

    /// Fill the unset parts of a projection config from this config.
    pub fn apply_to(&self, mut projection: ProjectionConfig) -> ProjectionConfig {
        if projection.delete_column.is_none() {
            projection.delete_column = Some(self.delete_column.clone());
        }
        if projection.datetime_format.is_none() {
            projection.datetime_format = self.datetime_format.clone();
        }
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ObjectInfoConfig::default();
        assert_eq!(config.delete_column, "deleted");
        assert_eq!(config.datetime_format, None);
        assert_eq!(config.soft_delete, SoftDeleteConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = ObjectInfoConfig::load(dir.path().join("missing")).unwrap();
        assert_eq!(config, ObjectInfoConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".objinfo");

        let mut config = ObjectInfoConfig::default();
        config.set("datetime-format", "date").unwrap();
        config.set("deleted-field", "removed").unwrap();
        config.save(&config_dir).unwrap();

        let loaded = ObjectInfoConfig::load(&config_dir).unwrap();
        assert_eq!(loaded.datetime_format.as_deref(), Some("date"));
        assert_eq!(loaded.soft_delete.field, "removed");
        assert_eq!(loaded.soft_delete.invalid_value, Value::Int(1));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"delete_column": "gone"}"#).unwrap();

        let config = ObjectInfoConfig::load(dir.path()).unwrap();
        assert_eq!(config.delete_column, "gone");
        assert_eq!(config.soft_delete.field, "deleted");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{not json").unwrap();
        assert!(matches!(
            ObjectInfoConfig::load(dir.path()),
            Err(ObjectInfoError::Serialization(_))
        ));
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = ObjectInfoConfig::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(config.get("datetime-format").as_deref(), Some(""));
        assert_eq!(config.get("nope"), None);

        config.set("delete-column", "removed").unwrap();
        assert_eq!(config.get("delete-column").as_deref(), Some("removed"));

        assert!(config.set("nope", "x").is_err());
        assert!(config.set("delete-column", "  ").is_err());
        assert!(config.set("deleted-field", "").is_err());
    }

    #[test]
    fn test_empty_datetime_format_clears() {
        let mut config = ObjectInfoConfig::default();
        config.set_datetime_format("min");
        assert_eq!(config.datetime_format.as_deref(), Some("min"));
        config.set_datetime_format("");
        assert_eq!(config.datetime_format, None);
    }

    #[test]
    fn test_apply_to_keeps_explicit_values() {
        let mut config = ObjectInfoConfig::default();
        config.set_datetime_format("year");
        config.set_delete_column("removed").unwrap();

        let filled = config.apply_to(ProjectionConfig::new());
        assert_eq!(filled.datetime_format.as_deref(), Some("year"));
        assert_eq!(filled.delete_column.as_deref(), Some("removed"));

        let explicit = config.apply_to(ProjectionConfig::new().datetime_format("date"));
        assert_eq!(explicit.datetime_format.as_deref(), Some("date"));
    }
}
