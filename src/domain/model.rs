use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw JSON object returned by one endpoint fetch.
pub type RawResponse = serde_json::Map<String, serde_json::Value>;

/// Per-endpoint derived record after extraction and calculation, input to
/// aggregation. Field names are written once and never overwritten; the
/// configuration loader rejects rule sets that would collide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl FlatRecord {
    pub fn numeric(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(serde_json::Value::as_f64)
    }
}

/// One output row of a grouped reduction: the group-by field values, the
/// computed `sum` or `average`, and a `metric` field naming the aggregated
/// value field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl AggregateRecord {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Scalar rendering used for group-key ordering and template output. Strings
/// and numbers render bare; anything else falls back to its JSON form with
/// surrounding quotes stripped.
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}
