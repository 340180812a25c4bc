#![allow(dead_code)]

use relevance_lens::analysis::Analyzer;
use relevance_lens::config::AnalysisConfig;
use relevance_lens::response::SearchResponse;
use relevance_lens::tree::ExplanationNode;
use serde_json::{json, Value};
use std::path::PathBuf;

pub const EPS: f64 = 1e-9;

pub fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_response.json")
}

pub fn sample_response() -> SearchResponse {
    SearchResponse::load_from_file(sample_path()).expect("sample response should load")
}

pub fn analyzer() -> Analyzer {
    Analyzer::new(&AnalysisConfig::default()).expect("default vocabulary compiles")
}

pub fn leaf(value: f64, description: &str) -> ExplanationNode {
    ExplanationNode::leaf(value, description)
}

pub fn node(value: f64, description: &str, children: Vec<ExplanationNode>) -> ExplanationNode {
    ExplanationNode::aggregate(value, description, children)
}

pub fn weight(field: &str, term: &str, value: f64) -> ExplanationNode {
    leaf(value, &format!("weight({}:{} in 113059)", field, term))
}

/// `{"nvPairs": [...]}` node in the engine's wire shape.
pub fn nv(value: f64, description: &str, details: Vec<Value>) -> Value {
    let mut pairs = vec![
        json!("match"),
        json!(true),
        json!("value"),
        json!(value),
        json!("description"),
        json!(description),
    ];
    if !details.is_empty() {
        pairs.push(json!("details"));
        pairs.push(Value::Array(details));
    }
    let mut map = serde_json::Map::new();
    map.insert("nvPairs".to_string(), Value::Array(pairs));
    Value::Object(map)
}

pub fn docs_json(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| json!({ "id": id, "name": format!("doc {}", id) }))
            .collect(),
    )
}
