use serde::Serialize;
use serde_json::json;

///
/// ExplainRowSource
///
/// Deterministic self-description of a row source: operator name, keyed
/// column and the driving sub-query's own explain output.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplainRowSource {
    pub op: &'static str,
    pub column: String,
    pub src: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor: Option<&'static str>,
}

impl ExplainRowSource {
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = json!({
            "op": self.op,
            "column": self.column,
            "src": self.src,
        });
        if let (Some(extractor), Some(map)) = (self.extractor, out.as_object_mut()) {
            map.insert("extractor".to_string(), json!(extractor));
        }

        out
    }
}
