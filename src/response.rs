use crate::error::{LensError, LensResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDocument {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolrDebug {
    #[serde(default)]
    pub explain: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Free-form diagnostics from the search service; passed through untouched.
    #[serde(default)]
    pub search_service_debug: Value,
    #[serde(default)]
    pub solr_debug: Option<SolrDebug>,
}

impl DebugInfo {
    pub fn explain_payload(&self) -> Option<&Value> {
        self.solr_debug
            .as_ref()
            .and_then(|s| s.explain.as_ref())
            .filter(|v| !v.is_null())
    }
}

/// A search response as delivered by the transport layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<ResultDocument>,
    #[serde(default)]
    pub num_found: u64,
    #[serde(default)]
    pub facets: Vec<Value>,
    #[serde(default)]
    pub debug: Option<DebugInfo>,
}

impl SearchResponse {
    /// Accepts the normalized shape or the engine's `placements[0]` envelope.
    pub fn from_json(mut raw: Value) -> LensResult<Self> {
        let envelope = raw.as_object_mut().and_then(|m| m.remove("placements"));
        match envelope {
            Some(Value::Array(placements)) => {
                let first = placements.into_iter().next().ok_or_else(|| {
                    LensError::Response("'placements' is present but empty".to_string())
                })?;
                Self::from_placement(first)
            }
            Some(_) => Err(LensError::Response(
                "'placements' must be an array".to_string(),
            )),
            None => from_value_deep(raw),
        }
    }

    /// Explain trees nest far deeper than serde_json's default recursion
    /// limit, so the parse grows its stack on demand instead.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LensResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut de = serde_json::Deserializer::from_str(&content);
        de.disable_recursion_limit();
        let raw = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Self::from_json(raw)
    }

    fn from_placement(placement: Value) -> LensResult<Self> {
        let mut fields = match placement {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let docs = match fields.remove("docs") {
            Some(v) => from_value_deep(v)?,
            None => Vec::new(),
        };
        let facets = match fields.remove("facets") {
            Some(Value::Array(f)) => f,
            _ => Vec::new(),
        };
        let num_found = fields
            .get("numFound")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let debug = fields.remove("debug").map(|d| match d {
            Value::Object(mut d) => DebugInfo {
                search_service_debug: d.remove("searchServiceDebug").unwrap_or(Value::Null),
                solr_debug: d.remove("solrDebug").map(|s| SolrDebug {
                    explain: match s {
                        Value::Object(mut s) => s.remove("explain"),
                        _ => None,
                    },
                }),
            },
            _ => DebugInfo::default(),
        });

        Ok(Self {
            docs,
            num_found,
            facets,
            debug,
        })
    }
}

fn from_value_deep<T: DeserializeOwned>(value: Value) -> LensResult<T> {
    Ok(T::deserialize(serde_stacker::Deserializer::new(value))?)
}

// Engines disagree on whether ids are strings or numbers.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "document id must be a string or number, got {}",
            other
        ))),
    }
}
