use super::{StoreError, TOUCHED_AT};
use crate::model::{DefaultScope, ModelSchema, Persistable, Readable, SaveOptions, Writable};
use crate::value::Value;
use chrono::Local;
use std::collections::BTreeMap;

/// Which save path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMethod {
    Save,
    SaveStrict,
}

/// A save invocation as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveCall {
    pub method: SaveMethod,
    pub options: SaveOptions,
}

/// An in-memory record: ordered attributes plus a log of save calls.
///
/// Records built from JSON remember each field's original document until
/// the field is written, so [`MemoryRecord::to_json`] reproduces untouched
/// fields byte for byte.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRecord {
    attributes: Vec<(String, Value)>,
    loaded: BTreeMap<String, serde_json::Value>,
    saves: Vec<SaveCall>,
    rejection: Option<String>,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or overwrite) an attribute.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.write_attribute(name, value.into());
        self
    }

    /// Make every subsequent save fail with `reason`.
    pub fn rejecting_saves(mut self, reason: impl Into<String>) -> Self {
        self.rejection = Some(reason.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Save calls received so far, oldest first.
    pub fn saves(&self) -> &[SaveCall] {
        &self.saves
    }

    pub fn last_save(&self) -> Option<&SaveCall> {
        self.saves.last()
    }

    /// Build a record from a JSON object. Full timestamp strings become
    /// date-time values.
    pub fn from_json(json: serde_json::Value) -> Result<Self, StoreError> {
        let serde_json::Value::Object(map) = json else {
            return Err(StoreError::Rejected(
                "a record must be a JSON object".to_string(),
            ));
        };
        let attributes = map
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_json_detecting_time(v.clone())))
            .collect();
        Ok(Self {
            attributes,
            loaded: map.into_iter().collect(),
            ..Default::default()
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(k, v)| {
                    let json = self.loaded.get(k).cloned().unwrap_or_else(|| v.to_json());
                    (k.clone(), json)
                })
                .collect(),
        )
    }

    /// Record the call, apply `touch`, and fail if saves are being rejected.
    pub(crate) fn accept_save(
        &mut self,
        method: SaveMethod,
        options: SaveOptions,
    ) -> Result<(), StoreError> {
        self.saves.push(SaveCall { method, options });
        if let Some(reason) = &self.rejection {
            return Err(StoreError::Rejected(reason.clone()));
        }
        if options.touch == Some(true) && self.has_attribute(TOUCHED_AT) {
            self.write_attribute(TOUCHED_AT, Value::DateTime(Local::now().naive_local()));
        }
        Ok(())
    }
}

impl Readable for MemoryRecord {
    fn attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|(k, _)| k.clone()).collect()
    }

    fn read_attribute(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl Writable for MemoryRecord {
    fn has_attribute(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn write_attribute(&mut self, name: &str, value: Value) {
        self.loaded.remove(name);
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }
}

impl Persistable for MemoryRecord {
    type Error = StoreError;

    fn save(&mut self, options: SaveOptions) -> bool {
        self.accept_save(SaveMethod::Save, options).is_ok()
    }

    fn save_strict(&mut self, options: SaveOptions) -> Result<(), StoreError> {
        self.accept_save(SaveMethod::SaveStrict, options)
    }
}

/// An in-memory model type: declared columns, default scopes and rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryModel {
    columns: Vec<String>,
    scopes: Vec<DefaultScope>,
    records: Vec<MemoryRecord>,
}

impl MemoryModel {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, record: MemoryRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut MemoryRecord> {
        self.records.get_mut(index)
    }

    pub fn default_scopes(&self) -> &[DefaultScope] {
        &self.scopes
    }

    /// Default query: rows passing every default scope.
    pub fn all(&self) -> Vec<&MemoryRecord> {
        self.records
            .iter()
            .filter(|record| self.scopes.iter().all(|scope| scope.matches(*record)))
            .collect()
    }

    /// Every row, ignoring default scopes.
    pub fn unscoped(&self) -> &[MemoryRecord] {
        &self.records
    }
}

impl ModelSchema for MemoryModel {
    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    fn add_default_scope(&mut self, scope: DefaultScope) {
        self.scopes.push(scope);
    }
}

// --- Test Fixtures ---
