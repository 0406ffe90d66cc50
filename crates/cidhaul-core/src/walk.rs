use std::collections::HashSet;

use serde_json::Value;

use crate::cid::Cid;
use crate::scan::{find_cids, scan_text};
use crate::sniff::FileKind;

/// Collect every identifier embedded in a parsed JSON value.
///
/// Strings are scanned with the recognizer; object values and array
/// elements are descended (keys are ignored). JSON values form a
/// tree, so no cycle tracking is needed; an explicit work stack keeps
/// deeply nested documents off the call stack. The result is an
/// unordered set with `parent` removed.
pub fn walk_json(value: &Value, parent: &Cid) -> HashSet<Cid> {
    let mut found = HashSet::new();
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::String(s) => found.extend(find_cids(s)),
            Value::Array(items) => stack.extend(items.iter()),
            Value::Object(map) => stack.extend(map.values()),
            _ => {}
        }
    }
    found.remove(parent);
    found
}

/// Scan an HTML or plain-text blob for identifiers.
///
/// No DOM parsing: the behavior to preserve is literal substring
/// scanning over the whole text.
pub fn walk_text(text: &str, parent: &Cid) -> HashSet<Cid> {
    scan_text(text, Some(parent))
}

/// Discover nested identifiers inside stored content.
///
/// Only JSON and HTML documents can carry references. A JSON payload
/// that fails to parse yields the empty set: the document itself
/// stays stored, only discovery is skipped.
pub fn discover(bytes: &[u8], kind: FileKind, parent: &Cid) -> HashSet<Cid> {
    match kind {
        FileKind::Json => match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => walk_json(&value, parent),
            Err(_) => HashSet::new(),
        },
        FileKind::Html => walk_text(&String::from_utf8_lossy(bytes), parent),
        _ => HashSet::new(),
    }
}
