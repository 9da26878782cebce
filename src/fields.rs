use crate::record::{FieldValue, LogRecord, Payload};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Per-field transform applied before a value is copied into the
/// outgoing payload. Registered by name on the hook.
pub type FilterFn = Box<dyn Fn(FieldValue) -> FieldValue + Send + Sync>;

/// Copy the record's fields into a fresh payload, applying the ignore
/// set, registered transforms, prefix promotion and error
/// normalization.
///
/// Prefix promotion mutates `record` in place: a field named
/// `<prefix><name>` with no `<name>` sibling in the record is removed
/// from the record and emitted under `<name>`. Later stages processing
/// the same record object observe the deletion. A prefixed field whose
/// unprefixed name is already taken is left untouched and emitted under
/// its prefixed name.
pub fn render(
    record: &mut LogRecord,
    ignore: &HashSet<String>,
    filters: &HashMap<String, FilterFn>,
    prefix: &str,
) -> Payload {
    let mut payload = Payload::new();
    let names: Vec<String> = record.fields.keys().cloned().collect();

    for name in names {
        if ignore.contains(&name) {
            continue;
        }
        let Some(mut value) = record.fields.get(&name).cloned() else {
            continue;
        };
        if let Some(filter) = filters.get(&name) {
            value = filter(value);
        }

        let mut key = name.clone();
        if !prefix.is_empty() {
            if let Some(trimmed) = name.strip_prefix(prefix) {
                if !record.fields.contains_key(trimmed) {
                    record.fields.remove(&name);
                    key = trimmed.to_string();
                }
            }
        }
        // An ignored name must not resurface through promotion.
        if ignore.contains(&key) {
            continue;
        }

        payload.insert(key, value.into_json());
    }

    payload
}

/// Delete every field whose name starts with the marker prefix,
/// mutating the record's mapping in place.
///
/// This is the whole of prefix-only mode: nothing is transmitted, and
/// running the pass a second time is a no-op.
pub fn strip_prefixed(fields: &mut BTreeMap<String, FieldValue>, prefix: &str) {
    if prefix.is_empty() {
        return;
    }
    fields.retain(|name, _| !name.starts_with(prefix));
}
