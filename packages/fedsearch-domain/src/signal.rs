//! Backend payload parsing. Both parsers degrade to an empty list on malformed input so a broken
//! backend can never fail the query.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DocSignal {
	pub id: String,
	pub title: String,
	pub raw_score: f64,
}

/// Parses a Solr-style `{"response":{"docs":[...]}}` payload.
///
/// Docs without a usable `score` get `max(1, total - index)`, so the backend's own ordering
/// survives normalization.
pub fn parse_lexical_signals(raw: &str) -> Vec<DocSignal> {
	let Ok(root) = serde_json::from_str::<Value>(raw) else {
		return Vec::new();
	};
	let Some(docs) = root.pointer("/response/docs").and_then(Value::as_array) else {
		return Vec::new();
	};
	let total = docs.len();
	let mut out = Vec::with_capacity(total);

	for (index, doc) in docs.iter().enumerate() {
		let Some(id) = doc.get("id").and_then(scalar_text).filter(|id| !id.trim().is_empty())
		else {
			continue;
		};
		let mut title = extract_title(doc.get("title"));

		if title.trim().is_empty() {
			title = extract_title(doc.get("title_t"));
		}

		let raw_score = extract_score(doc.get("score"))
			.unwrap_or_else(|| (total.saturating_sub(index) as f64).max(1.0));

		out.push(DocSignal { id, title, raw_score });
	}

	out
}

/// Parses a vector backend payload: a top-level array of
/// `{"documentId", "similarityScore", "title"}` objects.
pub fn parse_vector_signals(raw: &str) -> Vec<DocSignal> {
	let Ok(Value::Array(hits)) = serde_json::from_str::<Value>(raw) else {
		return Vec::new();
	};
	let mut out = Vec::with_capacity(hits.len());

	for hit in &hits {
		let Some(id) =
			hit.get("documentId").and_then(scalar_text).filter(|id| !id.trim().is_empty())
		else {
			continue;
		};
		let Some(raw_score) =
			hit.get("similarityScore").and_then(Value::as_f64).filter(|score| score.is_finite())
		else {
			continue;
		};
		let title = hit.get("title").and_then(scalar_text).unwrap_or_default();

		out.push(DocSignal { id, title, raw_score });
	}

	out
}

fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn extract_title(value: Option<&Value>) -> String {
	match value {
		Some(Value::String(title)) => title.clone(),
		Some(Value::Array(items)) =>
			items.first().and_then(Value::as_str).map(str::to_string).unwrap_or_default(),
		_ => String::new(),
	}
}

fn extract_score(value: Option<&Value>) -> Option<f64> {
	let score = match value? {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse::<f64>().ok(),
		_ => None,
	}?;

	score.is_finite().then_some(score)
}
