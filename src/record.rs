use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Payload field name used as the destination routing tag.
pub const TAG_FIELD: &str = "tag";

/// Payload field name carrying the record message.
/// If missing from the assembled payload, the record's own message is
/// set under this key.
pub const MESSAGE_FIELD: &str = "message";

/// Payload field name carrying the severity string.
pub const LEVEL_FIELD: &str = "level";

/// Payload field name carrying the application namespace.
pub const APP_FIELD: &str = "app";

/// Default marker prefix recognized by prefix promotion and prefix-only
/// stripping. An empty prefix disables both.
pub const DEFAULT_PREFIX: &str = "_";

/// Final mapping assembled for transmission.
pub type Payload = BTreeMap<String, Value>;

/// Always-sent fields shared between hook instances.
///
/// Hooks handed the same handle merge the same mapping into every
/// outgoing payload, overwriting same-named fields. The lock is the
/// synchronization contract for callers mutating the mapping while
/// records are in flight.
pub type SharedFields = Arc<RwLock<BTreeMap<String, Value>>>;

/// Record severity. Ordered like `tracing::Level`: `Error` is the most
/// severe and compares smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[serde(rename = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl Severity {
    /// Collector-facing string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Trace => "trace",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        if *level == tracing::Level::ERROR {
            Severity::Error
        } else if *level == tracing::Level::WARN {
            Severity::Warn
        } else if *level == tracing::Level::INFO {
            Severity::Info
        } else if *level == tracing::Level::DEBUG {
            Severity::Debug
        } else {
            Severity::Trace
        }
    }
}

/// A single record field value.
///
/// Most fields are plain JSON values. The `Error` variant carries an
/// opaque error object, which a structural serializer cannot represent
/// meaningfully; the field renderer turns it into its description
/// string before the payload is serialized.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Json(Value),
    Error(Arc<dyn Error + Send + Sync>),
}

impl FieldValue {
    /// Wrap an error value for structured capture.
    pub fn error(err: impl Error + Send + Sync + 'static) -> Self {
        FieldValue::Error(Arc::new(err))
    }

    /// Convert any serializable value into a field value. Serde field
    /// attributes on the type (`rename`, `skip_serializing`,
    /// `skip_serializing_if`) are honored by the conversion, so callers
    /// can annotate nested structures to rename or omit fields.
    pub fn serialize(value: &impl Serialize) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(FieldValue::Json)
    }

    /// Render into a serializable JSON value. Errors become their
    /// description string.
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Json(value) => value,
            FieldValue::Error(err) => Value::String(err.to_string()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

/// The unit of work handed to hooks: severity, message, timestamp and a
/// mutable field mapping.
///
/// A record is created per log call and owned by that call for the
/// duration of the hook invocation. Hooks may delete keys from
/// `fields` as part of prefix handling; the deletion is visible to any
/// later hook fired on the same record.
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl LogRecord {
    /// Create a record stamped with the current time and no fields.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        LogRecord {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a field, builder-style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}
