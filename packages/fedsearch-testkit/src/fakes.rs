use std::{
	collections::HashMap,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use fedsearch_domain::QueryResult;
use fedsearch_service::{
	BoxFuture, Error, LexicalSearch, Metrics, QueryLog, QueryLogEntry, RemoteCache, Result,
	SemanticSearch,
};
use serde_json::json;

/// What a scripted backend answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
	Body(String),
	Fail(String),
}
impl Reply {
	fn resolve(&self) -> Result<String> {
		match self {
			Self::Body(body) => Ok(body.clone()),
			Self::Fail(message) => Err(Error::Provider { message: message.clone() }),
		}
	}
}

/// Builds a lexical payload from `(id, title, score)` triples.
pub fn lexical_docs(docs: &[(&str, &str, f64)]) -> String {
	let docs: Vec<_> = docs
		.iter()
		.map(|(id, title, score)| json!({"id": id, "title": title, "score": score}))
		.collect();

	json!({"response": {"docs": docs}}).to_string()
}

/// Builds a vector payload from `(documentId, similarityScore)` pairs.
pub fn vector_hits(hits: &[(&str, f64)]) -> String {
	let hits: Vec<_> = hits
		.iter()
		.map(|(id, score)| json!({"documentId": id, "similarityScore": score}))
		.collect();

	serde_json::Value::Array(hits).to_string()
}

pub struct FakeLexical {
	search: Reply,
	facets: Reply,
	delay: Duration,
	calls: AtomicUsize,
	facet_calls: AtomicUsize,
}
impl FakeLexical {
	pub fn returning(body: impl Into<String>) -> Self {
		Self::new(Reply::Body(body.into()))
	}

	pub fn failing(message: impl Into<String>) -> Self {
		Self::new(Reply::Fail(message.into()))
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}

	pub fn with_facets(mut self, facets: Reply) -> Self {
		self.facets = facets;

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn facet_calls(&self) -> usize {
		self.facet_calls.load(Ordering::SeqCst)
	}

	fn new(search: Reply) -> Self {
		Self {
			search,
			facets: Reply::Fail("facets not scripted".to_string()),
			delay: Duration::ZERO,
			calls: AtomicUsize::new(0),
			facet_calls: AtomicUsize::new(0),
		}
	}
}
impl LexicalSearch for FakeLexical {
	fn search<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			self.search.resolve()
		})
	}

	fn facets<'a>(&'a self, field: &'a str, limit: u32) -> BoxFuture<'a, Result<String>> {
		self.facet_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			self.facets
				.resolve()
				.map(|body| body.replace("{field}", field).replace("{limit}", &limit.to_string()))
		})
	}
}

pub struct FakeSemantic {
	search: Reply,
	delay: Duration,
	calls: AtomicUsize,
	last_top_k: AtomicUsize,
}
impl FakeSemantic {
	pub fn returning(body: impl Into<String>) -> Self {
		Self::new(Reply::Body(body.into()))
	}

	pub fn failing(message: impl Into<String>) -> Self {
		Self::new(Reply::Fail(message.into()))
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn last_top_k(&self) -> usize {
		self.last_top_k.load(Ordering::SeqCst)
	}

	fn new(search: Reply) -> Self {
		Self {
			search,
			delay: Duration::ZERO,
			calls: AtomicUsize::new(0),
			last_top_k: AtomicUsize::new(0),
		}
	}
}
impl SemanticSearch for FakeSemantic {
	fn search<'a>(&'a self, _query: &'a str, top_k: u32) -> BoxFuture<'a, Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.last_top_k.store(top_k as usize, Ordering::SeqCst);

		Box::pin(async move {
			if !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			self.search.resolve()
		})
	}
}

/// In-memory stand-in for the caching service. Ignores TTLs.
#[derive(Default)]
pub struct MemoryRemoteCache {
	entries: Mutex<HashMap<String, QueryResult>>,
	fail: bool,
	read_delay: Duration,
	gets: AtomicUsize,
	puts: AtomicUsize,
}
impl MemoryRemoteCache {
	pub fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	/// Every `get` sleeps for `delay` before answering, eating into the request budget.
	pub fn with_read_delay(mut self, delay: Duration) -> Self {
		self.read_delay = delay;

		self
	}

	pub fn gets(&self) -> usize {
		self.gets.load(Ordering::SeqCst)
	}

	pub fn puts(&self) -> usize {
		self.puts.load(Ordering::SeqCst)
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn insert(&self, key: &str, value: QueryResult) {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).insert(key.to_string(), value);
	}
}
impl RemoteCache for MemoryRemoteCache {
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<QueryResult>>> {
		self.gets.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if !self.read_delay.is_zero() {
				tokio::time::sleep(self.read_delay).await;
			}
			if self.fail {
				return Err(Error::Cache { message: "remote cache unavailable".to_string() });
			}

			Ok(self.entries.lock().unwrap_or_else(|err| err.into_inner()).get(key).cloned())
		})
	}

	fn put<'a>(
		&'a self,
		key: &'a str,
		_ttl_seconds: u64,
		value: &'a QueryResult,
	) -> BoxFuture<'a, Result<()>> {
		self.puts.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if self.fail {
				return Err(Error::Cache { message: "remote cache unavailable".to_string() });
			}

			self.insert(key, value.clone());

			Ok(())
		})
	}
}

#[derive(Default)]
pub struct SpyMetrics {
	counters: Mutex<HashMap<&'static str, usize>>,
	timings: Mutex<HashMap<&'static str, Vec<Duration>>>,
}
impl SpyMetrics {
	pub fn count(&self, name: &str) -> usize {
		self.counters.lock().unwrap_or_else(|err| err.into_inner()).get(name).copied().unwrap_or(0)
	}

	pub fn timings(&self, name: &str) -> Vec<Duration> {
		self.timings
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.get(name)
			.cloned()
			.unwrap_or_default()
	}
}
impl Metrics for SpyMetrics {
	fn increment(&self, name: &'static str) {
		*self.counters.lock().unwrap_or_else(|err| err.into_inner()).entry(name).or_insert(0) += 1;
	}

	fn record(&self, name: &'static str, duration: Duration) {
		self.timings
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.entry(name)
			.or_default()
			.push(duration);
	}
}

#[derive(Default)]
pub struct SpyQueryLog {
	entries: Mutex<Vec<QueryLogEntry>>,
	fail: bool,
}
impl SpyQueryLog {
	pub fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	pub fn entries(&self) -> Vec<QueryLogEntry> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// Polls until at least `count` entries arrived or `timeout` elapses.
	pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<QueryLogEntry> {
		let deadline = tokio::time::Instant::now() + timeout;

		loop {
			let entries = self.entries();

			if entries.len() >= count || tokio::time::Instant::now() >= deadline {
				return entries;
			}

			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	}
}
impl QueryLog for SpyQueryLog {
	fn write<'a>(&'a self, entry: &'a QueryLogEntry) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if self.fail {
				return Err(Error::Storage { message: "query log unavailable".to_string() });
			}

			self.entries.lock().unwrap_or_else(|err| err.into_inner()).push(entry.clone());

			Ok(())
		})
	}
}
