//! JSON-LD structured data extraction

use crate::document::DocumentTree;
use serde_json::Value;
use tracing::debug;

const JSON_LD_TYPE: &str = "application/ld+json";

/// Parse every JSON-LD script block. Blocks that fail to parse are treated
/// as absent; one bad block never prevents later blocks from being read.
pub fn parse_blocks(doc: &dyn DocumentTree) -> Vec<Value> {
    doc.elements_with_attr("script", "type", JSON_LD_TYPE)
        .iter()
        .enumerate()
        .filter_map(|(idx, script)| match serde_json::from_str::<Value>(script.text()) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(block = idx, error = %err, "skipping malformed JSON-LD block");
                None
            }
        })
        .collect()
}

/// Entities declared by one block: the top-level object, each element of a
/// top-level array, and each member of an `@graph` array.
pub fn entities(block: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    match block {
        Value::Array(items) => {
            for item in items {
                push_with_graph(item, &mut out);
            }
        }
        other => push_with_graph(other, &mut out),
    }
    out
}

fn push_with_graph<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    if !value.is_object() {
        return;
    }
    out.push(value);
    if let Some(Value::Array(graph)) = value.get("@graph") {
        out.extend(graph.iter().filter(|v| v.is_object()));
    }
}

/// Whether the entity's `@type` (string or array of strings) names `type_name`
pub fn has_type(entity: &Value, type_name: &str) -> bool {
    match entity.get("@type") {
        Some(Value::String(t)) => t == type_name,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(type_name)),
        _ => false,
    }
}

/// Length of the `mainEntity` list, 0 when absent or not a list
pub fn main_entity_count(entity: &Value) -> usize {
    entity
        .get("mainEntity")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}
