use crate::record::{Payload, Severity, SharedFields, APP_FIELD, LEVEL_FIELD, MESSAGE_FIELD};
use serde_json::Value;

/// Merge the always-sent mapping into the payload, overwriting any
/// same-named fields already present.
pub fn merge_always_sent(payload: &mut Payload, shared: &SharedFields) {
    let fields = shared.read().expect("always-sent fields lock poisoned");
    for (name, value) in fields.iter() {
        payload.insert(name.clone(), value.clone());
    }
}

/// Record the application namespace under its reserved key.
pub fn set_app(payload: &mut Payload, app: &str) {
    payload.insert(APP_FIELD.to_string(), Value::String(app.to_string()));
}

/// Record the severity string under its reserved key. Always
/// overwrites.
pub fn set_level(payload: &mut Payload, severity: Severity) {
    payload.insert(
        LEVEL_FIELD.to_string(),
        Value::String(severity.as_str().to_string()),
    );
}

/// Record the message unless a renamed or promoted field already
/// supplied one.
pub fn set_message(payload: &mut Payload, message: &str) {
    if !payload.contains_key(MESSAGE_FIELD) {
        payload.insert(MESSAGE_FIELD.to_string(), Value::String(message.to_string()));
    }
}
