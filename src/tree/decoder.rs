use super::{ExplanationForest, ExplanationNode};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const PAIRS_KEY: &str = "nvPairs";

/// Decodes the document-indexed explain payload: `[id1, node1, id2, node2, ...]`,
/// either bare or wrapped as `{"nvPairs": [...]}`, or an object keyed by id.
///
/// Never fails: entries that cannot be read are skipped.
pub fn decode_forest(raw: &Value) -> ExplanationForest {
    let mut forest = ExplanationForest::new();

    match pair_sequence(raw) {
        Some(pairs) => {
            if pairs.len() % 2 != 0 {
                warn!(
                    "Explain sequence has odd length {}; trailing key ignored",
                    pairs.len()
                );
            }
            for chunk in pairs.chunks_exact(2) {
                match document_id(&chunk[0]) {
                    Some(id) => forest.push(id, decode_node(&chunk[1])),
                    None => warn!("Skipping explain entry with non-scalar id: {}", chunk[0]),
                }
            }
        }
        None => {
            if let Value::Object(map) = raw {
                for (id, node) in map {
                    forest.push(id.clone(), decode_node(node));
                }
            }
        }
    }

    debug!("Decoded explanation forest with {} entries", forest.len());
    forest
}

/// Decodes one node and its whole subtree.
///
/// Uses an explicit work stack, so tree depth is bounded by memory only.
pub fn decode_node(raw: &Value) -> ExplanationNode {
    let mut nodes: Vec<ExplanationNode> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut stack: Vec<(&Value, Option<usize>)> = vec![(raw, None)];

    // Pass 1: pre-order, every child gets a higher index than its parent.
    while let Some((value, parent)) = stack.pop() {
        let (node, details) = read_header(value);
        let index = nodes.len();
        nodes.push(node);
        parents.push(parent);
        for child in details.iter().rev() {
            stack.push((child, Some(index)));
        }
    }

    // Pass 2: attach bottom-up. Children arrive in reverse sibling order.
    let mut root = ExplanationNode::default();
    for index in (0..nodes.len()).rev() {
        let mut node = std::mem::take(&mut nodes[index]);
        node.children.reverse();
        match parents[index] {
            Some(parent) => nodes[parent].children.push(node),
            None => root = node,
        }
    }
    root
}

fn read_header(raw: &Value) -> (ExplanationNode, &[Value]) {
    let mut node = ExplanationNode::default();
    let mut details: &[Value] = &[];

    if let Some(pairs) = pair_sequence(raw) {
        for chunk in pairs.chunks_exact(2) {
            if let Value::String(key) = &chunk[0] {
                apply_field(&mut node, &mut details, key, &chunk[1]);
            }
        }
    } else if let Value::Object(map) = raw {
        read_structured(&mut node, &mut details, map);
    }

    (node, details)
}

fn read_structured<'a>(
    node: &mut ExplanationNode,
    details: &mut &'a [Value],
    map: &'a Map<String, Value>,
) {
    for (key, value) in map {
        apply_field(node, details, key, value);
    }
}

fn apply_field<'a>(
    node: &mut ExplanationNode,
    details: &mut &'a [Value],
    key: &str,
    value: &'a Value,
) {
    match key {
        "match" => node.matched = value.as_bool().unwrap_or(false),
        "value" => match value.as_f64() {
            Some(v) => node.value = v,
            None => warn!("Non-numeric explanation value: {}", value),
        },
        "description" => {
            if let Some(text) = value.as_str() {
                node.description = text.to_string();
            }
        }
        "details" => {
            if let Value::Array(children) = value {
                *details = children.as_slice();
            }
        }
        _ => {}
    }
}

/// The alternating key/value list of a node or forest, if `raw` has one.
fn pair_sequence(raw: &Value) -> Option<&[Value]> {
    match raw {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(map) => match map.get(PAIRS_KEY) {
            Some(Value::Array(items)) => Some(items.as_slice()),
            _ => None,
        },
        _ => None,
    }
}

fn document_id(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
