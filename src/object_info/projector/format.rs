//! Date/time output formats.

use crate::value::Value;
use std::fmt::Write;

/// A resolved date/time format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormat {
    /// Keep the native date/time value.
    Standard,
    /// `YYYY-MM-DD HH:mm:ss`
    Full,
    /// `YYYY-MM-DD HH:mm`
    Min,
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY`
    Year,
    /// Raw strftime-style pattern.
    Pattern(String),
}

impl DateFormat {
    /// Interpret a format token. Unrecognized tokens are strftime patterns.
    pub fn parse(token: &str) -> Self {
        match token {
            "standard" => DateFormat::Standard,
            "full" => DateFormat::Full,
            "min" => DateFormat::Min,
            "date" => DateFormat::Date,
            "year" => DateFormat::Year,
            pattern => DateFormat::Pattern(pattern.to_string()),
        }
    }

    /// The strftime pattern, or `None` for [`DateFormat::Standard`].
    pub fn pattern(&self) -> Option<&str> {
        match self {
            DateFormat::Standard => None,
            DateFormat::Full => Some("%Y-%m-%d %H:%M:%S"),
            DateFormat::Min => Some("%Y-%m-%d %H:%M"),
            DateFormat::Date => Some("%Y-%m-%d"),
            DateFormat::Year => Some("%Y"),
            DateFormat::Pattern(p) => Some(p),
        }
    }

    /// Render a temporal value. Non-temporal values pass through.
    ///
    /// Dates render as midnight when the pattern asks for time fields. A
    /// pattern chrono cannot render leaves the value unconverted.
    pub fn apply(&self, value: &Value) -> Value {
        let Some(pattern) = self.pattern() else {
            return value.clone();
        };
        let Some(timestamp) = value.as_datetime() else {
            return value.clone();
        };

        let mut rendered = String::new();
        if write!(rendered, "{}", timestamp.format(pattern)).is_err() {
            tracing::warn!(pattern, "unusable date format, keeping native value");
            return value.clone();
        }
        Value::Str(rendered)
    }
}
