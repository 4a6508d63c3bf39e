//! Response interpreter: turns the free-form text a vision model returned into
//! a `PlantRecord`.
//!
//! The model is asked for `key: value` lines but nothing guarantees it
//! complies, so interpretation is line-oriented and never fails:
//!
//! - a line containing `:` starts a field; the key is the lower-cased, trimmed
//!   text before the first colon, the value is the trimmed remainder (further
//!   colons included) and replaces any earlier value for that key;
//! - a non-blank line without `:` continues the current field, joined with a
//!   single space (no space when the field's value is still empty, so
//!   `name:` then `Snake Plant` gives `Snake Plant`);
//! - lines without `:` before any field has started are dropped;
//! - if no field was found at all, the whole trimmed text becomes `description`.

use std::collections::BTreeMap;

use florascope_core::PlantRecord;

const FALLBACK_KEY: &str = "description";

pub fn interpret(text: &str) -> PlantRecord {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in text.split('\n') {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_lowercase();
            fields.insert(key.clone(), value.trim().to_string());
            current = Some(key);
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(value) = current.as_ref().and_then(|k| fields.get_mut(k)) {
            // An empty value ("name:" on its own line) takes the continuation as-is.
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line);
        }
    }

    if fields.is_empty() {
        fields.insert(FALLBACK_KEY.to_string(), text.trim().to_string());
    }

    PlantRecord::from(fields)
}
