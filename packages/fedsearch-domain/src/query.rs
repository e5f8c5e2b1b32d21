use serde::{Deserialize, Serialize};

const MODE_HYBRID: &str = "hybrid";
const MODE_LEXICAL: &str = "lexical";
const MODE_SEMANTIC: &str = "semantic";
const FILTER_NONE: &str = "none";
const FILTER_SOLR: &str = "solr";
const FILTER_VECTOR: &str = "vector";

/// Inbound search request as it arrives from the transport layer. Every field is optional and
/// resolved against defaults by [`ResolvedQuery::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
	pub query: Option<String>,
	pub top_k: Option<i64>,
	pub mode: Option<String>,
	pub filter: Option<String>,
}
impl QueryRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: Some(query.into()), ..Default::default() }
	}

	pub fn with_top_k(mut self, top_k: i64) -> Self {
		self.top_k = Some(top_k);

		self
	}

	pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
		self.mode = Some(mode.into());

		self
	}

	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = Some(filter.into());

		self
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QueryMode {
	#[default]
	Hybrid,
	Lexical,
	Semantic,
}
impl QueryMode {
	/// Unknown or absent values fall back to [`QueryMode::Hybrid`].
	pub fn resolve(raw: Option<&str>) -> Self {
		let Some(raw) = raw else {
			return Self::Hybrid;
		};

		match raw.trim().to_ascii_lowercase().as_str() {
			MODE_LEXICAL => Self::Lexical,
			MODE_SEMANTIC => Self::Semantic,
			_ => Self::Hybrid,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Hybrid => MODE_HYBRID,
			Self::Lexical => MODE_LEXICAL,
			Self::Semantic => MODE_SEMANTIC,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResultFilter {
	#[default]
	None,
	LexicalOnly,
	VectorOnly,
}
impl ResultFilter {
	pub fn resolve(raw: Option<&str>) -> Self {
		let Some(raw) = raw else {
			return Self::None;
		};

		match raw.trim().to_ascii_lowercase().as_str() {
			FILTER_SOLR | "lexical" | "lexical-only" => Self::LexicalOnly,
			FILTER_VECTOR | "semantic" | "vector-only" => Self::VectorOnly,
			_ => Self::None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => FILTER_NONE,
			Self::LexicalOnly => FILTER_SOLR,
			Self::VectorOnly => FILTER_VECTOR,
		}
	}
}

/// A request with every field resolved to its canonical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
	pub text: String,
	pub top_k: u32,
	pub mode: QueryMode,
	pub filter: ResultFilter,
}
impl ResolvedQuery {
	pub fn resolve(req: &QueryRequest, default_top_k: u32) -> Self {
		let top_k = match req.top_k {
			Some(top_k) if top_k > 0 => u32::try_from(top_k).unwrap_or(u32::MAX),
			_ => default_top_k.max(1),
		};

		Self {
			text: req.query.clone().unwrap_or_default(),
			top_k,
			mode: QueryMode::resolve(req.mode.as_deref()),
			filter: ResultFilter::resolve(req.filter.as_deref()),
		}
	}

	/// Shared key for both cache tiers and the single-flight registry.
	pub fn request_key(&self) -> String {
		format!("{}::{}::{}::{}", self.text, self.top_k, self.mode.as_str(), self.filter.as_str())
	}

	pub fn is_blank(&self) -> bool {
		self.text.trim().is_empty()
	}

	pub fn summary_message(&self) -> String {
		format!(
			"Hybrid result from Solr + Vector search [mode={} filter={}]",
			self.mode.as_str(),
			self.filter.as_str()
		)
	}
}
