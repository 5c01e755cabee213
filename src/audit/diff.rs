//! Human-readable change summaries between audit snapshots

use serde_json::Value;

/// Summarize the changes between two serialized snapshots.
///
/// Both sides are expected to be JSON text as stored on an audit record.
/// Returns `None` when either side is missing, unparseable, or nothing
/// changed. Only top-level field changes are reported, for readability.
pub fn diff_summary(before: Option<&str>, after: Option<&str>) -> Option<String> {
    let before: Value = serde_json::from_str(before?).ok()?;
    let after: Value = serde_json::from_str(after?).ok()?;

    match (&before, &after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(&before),
            format_value(&after)
        )),
        _ => None,
    }
}

/// Format a JSON value for single-line display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let truncated: String = s.chars().take(47).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
