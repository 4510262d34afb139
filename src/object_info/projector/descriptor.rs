//! Attribute descriptors.
//!
//! A projection is driven by an ordered list of [`AttributeEntry`]s. Each one
//! is either a bare attribute name, a full [`AttributeDescriptor`], or
//! something the projector does not understand and silently skips.

use crate::model::Readable;
use crate::value::Value;
use serde::de::Deserializer;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Signature of a callable filter: receives the raw value and the instance.
pub type FilterFn = dyn Fn(&Value, &dyn Readable) -> Value + Send + Sync;

/// How a descriptor turns its raw value into the output value.
#[derive(Clone)]
pub enum Filter {
    /// Closure evaluated with the raw value and the instance as context.
    Callable(Arc<FilterFn>),
    /// Zero-argument method invoked on the instance; the raw value is ignored.
    Method(String),
    /// Used verbatim; the raw value is ignored.
    Literal(Value),
}

impl Filter {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Value, &dyn Readable) -> Value + Send + Sync + 'static,
    {
        Filter::Callable(Arc::new(f))
    }

    pub fn method(name: impl Into<String>) -> Self {
        Filter::Method(name.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Filter::Literal(value.into())
    }

    /// Blank filters (empty method names, blank literals) count as no filter.
    pub fn is_present(&self) -> bool {
        match self {
            Filter::Callable(_) => true,
            Filter::Method(name) => !name.is_empty(),
            Filter::Literal(value) => value.is_present(),
        }
    }

    pub fn apply(&self, value: &Value, instance: &dyn Readable) -> Value {
        match self {
            Filter::Callable(f) => f(value, instance),
            Filter::Method(name) => instance.call_method(name),
            Filter::Literal(literal) => literal.clone(),
        }
    }

    /// `{"method": "<name>"}` is a method reference, anything else a literal.
    pub fn from_json(json: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = &json {
            if map.len() == 1 {
                if let Some(serde_json::Value::String(name)) = map.get("method") {
                    return Filter::Method(name.clone());
                }
            }
        }
        Filter::Literal(Value::from_json(json))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Callable(_) => f.write_str("Callable(..)"),
            Filter::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Filter::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
        }
    }
}

/// The `type` setting of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    /// No underlying attribute; the output comes from the filter alone.
    Abstract,
    /// Always included, even outside the allowed attribute set.
    Method,
    /// Any other value. Carried along but has no effect.
    Other(String),
}

impl AttributeType {
    pub fn parse(token: &str) -> Self {
        match token {
            "abstract" => AttributeType::Abstract,
            "method" => AttributeType::Method,
            other => AttributeType::Other(other.to_string()),
        }
    }
}

/// Full settings for one output attribute.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    /// Declared name. Filtered and formatted results are stored under it.
    pub name: String,
    /// Optional output key (`as`). Also the attribute that gets read.
    pub output: Option<String>,
    pub filter: Option<Filter>,
    /// Per-attribute date/time format token or strftime pattern.
    pub format: Option<String>,
    pub kind: Option<AttributeType>,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: None,
            filter: None,
            format: None,
            kind: None,
        }
    }

    /// Set the `as` output key.
    pub fn output_as(mut self, key: impl Into<String>) -> Self {
        self.output = Some(key.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn kind(mut self, kind: AttributeType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// `as` when present, otherwise the declared name.
    pub fn output_key(&self) -> &str {
        self.output
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(&self.name)
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == Some(AttributeType::Abstract)
    }

    /// Abstract and method descriptors bypass the only/except sets.
    pub fn bypasses_selection(&self) -> bool {
        matches!(
            self.kind,
            Some(AttributeType::Abstract) | Some(AttributeType::Method)
        )
    }

    /// The configured filter, unless it is blank.
    pub fn present_filter(&self) -> Option<&Filter> {
        self.filter.as_ref().filter(|f| f.is_present())
    }

    /// Build a descriptor from a JSON object. Keys are matched
    /// case-insensitively. Returns `None` when no usable name is given.
    pub fn from_json_object(map: serde_json::Map<String, serde_json::Value>) -> Option<Self> {
        let mut name = None;
        let mut output = None;
        let mut filter = None;
        let mut format = None;
        let mut kind = None;

        for (key, value) in map {
            match key.to_ascii_lowercase().as_str() {
                "name" => name = json_text(value),
                "as" => output = json_text(value),
                "filter" => filter = Some(Filter::from_json(value)),
                "format" => format = json_text(value),
                "type" => kind = json_text(value).map(|t| AttributeType::parse(&t)),
                _ => {}
            }
        }

        // An unnamed entry is keyed by its output key.
        let name = name.or_else(|| output.clone())?;
        Some(Self {
            name,
            output,
            filter,
            format,
            kind,
        })
    }
}

fn json_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One element of the `attributes` list.
#[derive(Debug, Clone)]
pub enum AttributeEntry {
    /// Include the named attribute as-is.
    Name(String),
    Descriptor(AttributeDescriptor),
    /// Any other shape. Skipped without error.
    Unsupported(serde_json::Value),
}

impl AttributeEntry {
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(name) => AttributeEntry::Name(name),
            serde_json::Value::Object(map) => {
                match AttributeDescriptor::from_json_object(map.clone()) {
                    Some(descriptor) => AttributeEntry::Descriptor(descriptor),
                    None => AttributeEntry::Unsupported(serde_json::Value::Object(map)),
                }
            }
            other => AttributeEntry::Unsupported(other),
        }
    }

    /// Normalize the entry into a descriptor, or `None` for unsupported entries.
    pub fn descriptor(&self) -> Option<Cow<'_, AttributeDescriptor>> {
        match self {
            AttributeEntry::Name(name) => Some(Cow::Owned(AttributeDescriptor::new(name.clone()))),
            AttributeEntry::Descriptor(descriptor) => Some(Cow::Borrowed(descriptor)),
            AttributeEntry::Unsupported(_) => None,
        }
    }
}

impl From<&str> for AttributeEntry {
    fn from(name: &str) -> Self {
        AttributeEntry::Name(name.to_string())
    }
}

impl From<String> for AttributeEntry {
    fn from(name: String) -> Self {
        AttributeEntry::Name(name)
    }
}

impl From<AttributeDescriptor> for AttributeEntry {
    fn from(descriptor: AttributeDescriptor) -> Self {
        AttributeEntry::Descriptor(descriptor)
    }
}

impl<'de> Deserialize<'de> for AttributeEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(AttributeEntry::from_json(json))
    }
}
