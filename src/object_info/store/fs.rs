use super::memory::{MemoryRecord, SaveMethod};
use super::StoreError;
use crate::model::{Persistable, Readable, SaveOptions, Writable};
use crate::value::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A record stored as a single JSON object on disk.
///
/// Reads and writes happen in memory; saving rewrites the file atomically
/// (temporary file, then rename).
#[derive(Debug, Clone)]
pub struct JsonFileRecord {
    path: PathBuf,
    record: MemoryRecord,
}

impl JsonFileRecord {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        let json: serde_json::Value = serde_json::from_str(&content)?;
        let record = MemoryRecord::from_json(json)?;
        Ok(Self { path, record })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &MemoryRecord {
        &self.record
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.record.to_json()
    }

    fn write(&mut self, method: SaveMethod, options: SaveOptions) -> Result<(), StoreError> {
        self.record.accept_save(method, options)?;

        let content = serde_json::to_string_pretty(&self.record.to_json())?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Readable for JsonFileRecord {
    fn attribute_names(&self) -> Vec<String> {
        self.record.attribute_names()
    }

    fn read_attribute(&self, name: &str) -> Value {
        self.record.read_attribute(name)
    }
}

impl Writable for JsonFileRecord {
    fn has_attribute(&self, name: &str) -> bool {
        self.record.has_attribute(name)
    }

    fn write_attribute(&mut self, name: &str, value: Value) {
        self.record.write_attribute(name, value);
    }
}

impl Persistable for JsonFileRecord {
    type Error = StoreError;

    fn save(&mut self, options: SaveOptions) -> bool {
        match self.write(SaveMethod::Save, options) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "save failed");
                false
            }
        }
    }

    fn save_strict(&mut self, options: SaveOptions) -> Result<(), StoreError> {
        self.write(SaveMethod::SaveStrict, options)
    }
}
