use serde::{Deserialize, Serialize};

pub const EMPTY_LEXICAL_RESPONSE: &str = "{\"response\":{\"docs\":[]}}";
pub const EMPTY_VECTOR_RESPONSE: &str = "[]";
pub const EMPTY_FACETS_RESPONSE: &str = "{\"facet_counts\":{\"facet_fields\":{}}}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(rename = "score")]
	pub fused_score: f64,
	#[serde(default)]
	pub lexical_score: f64,
	#[serde(default)]
	pub semantic_score: f64,
}

/// Externally visible outcome of one hybrid query. Cloning produces a fully independent copy, which
/// is what the caches store and hand back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
	#[serde(default)]
	pub message: String,
	#[serde(rename = "solrResult", default)]
	pub lexical_payload: String,
	#[serde(rename = "vectorResult", default)]
	pub vector_payload: String,
	#[serde(default)]
	pub ranked_results: Vec<RankedResult>,
}
