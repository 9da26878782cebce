use crate::record::{LogRecord, Payload, TAG_FIELD};
use serde_json::Value;

/// Compute the destination routing tag for a record.
///
/// Precedence, first match wins:
/// 1. the hook's static tag, used verbatim;
/// 2. a string-typed `tag` field in the payload;
/// 3. `<app>.main` when an app namespace is configured;
/// 4. the record's message.
///
/// When an app namespace is configured and rule 2 matched, the final
/// tag is `<app>.<tag>` for a non-empty tag field, else just `<app>`.
/// Absent data always falls through to the next rule; resolution cannot
/// fail.
pub fn resolve(
    static_tag: Option<&str>,
    app: Option<&str>,
    record: &LogRecord,
    payload: &Payload,
) -> String {
    if let Some(tag) = static_tag {
        return tag.to_string();
    }

    // A present but non-string tag field counts as absent.
    let field = payload.get(TAG_FIELD).and_then(Value::as_str);

    match (field, app) {
        (None, Some(app)) => format!("{}.main", app),
        (None, None) => record.message.clone(),
        (Some(tag), Some(app)) => {
            if tag.is_empty() {
                app.to_string()
            } else {
                format!("{}.{}", app, tag)
            }
        }
        (Some(tag), None) => tag.to_string(),
    }
}
