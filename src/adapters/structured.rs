use serde_json::Value;

use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::domain::ExtractedItem;

/// Structured-endpoint adapter for JSON APIs. `selectors.item` is a JSON
/// pointer to the items array; `title` (required), `link`, `date`, and
/// `version` name fields within each element. Absent declared structure is
/// a parse error.
pub fn extract(body: &str, source: &SourceDefinition) -> Result<Vec<ExtractedItem>> {
    let selectors = source
        .selectors
        .as_ref()
        .ok_or_else(|| DriftError::Parse(format!("[{}] missing required selectors", source.id)))?;

    let pointer = selectors
        .item
        .as_deref()
        .ok_or_else(|| DriftError::Parse(format!("[{}] missing selectors.item", source.id)))?;
    let title_field = selectors
        .title
        .as_deref()
        .ok_or_else(|| DriftError::Parse(format!("[{}] missing selectors.title", source.id)))?;

    let value: Value = serde_json::from_str(body)
        .map_err(|e| DriftError::Parse(format!("[{}] invalid JSON: {}", source.id, e)))?;

    let pointer = normalize_pointer(pointer);
    let entries = value
        .pointer(&pointer)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            DriftError::Parse(format!(
                "[{}] items pointer {:?} matched no array",
                source.id, pointer
            ))
        })?;

    let mut items = Vec::new();
    for entry in entries.iter().take(source.max_items) {
        let title = field_str(entry, title_field).ok_or_else(|| {
            DriftError::Parse(format!(
                "[{}] declared field {:?} absent from item",
                source.id, title_field
            ))
        })?;

        let link = selectors.link.as_deref().and_then(|f| field_str(entry, f));
        let date = selectors.date.as_deref().and_then(|f| field_str(entry, f));
        let tag = selectors
            .version
            .as_deref()
            .and_then(|f| field_str(entry, f));

        let id = tag
            .clone()
            .or_else(|| link.clone())
            .unwrap_or_else(|| title.clone());

        let mut item = ExtractedItem::new(id, title);
        item.link = link;
        item.date = date;
        item.tag = tag;
        items.push(item);
    }

    Ok(items)
}

/// Accepts both `/data/releases` and dotted `data.releases` forms.
fn normalize_pointer(pointer: &str) -> String {
    if pointer.starts_with('/') {
        pointer.to_string()
    } else {
        format!("/{}", pointer.replace('.', "/"))
    }
}

fn field_str(entry: &Value, field: &str) -> Option<String> {
    match entry.get(field)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
