pub mod cache;
pub mod facets;
pub mod metrics;
pub mod search;
pub mod single_flight;
pub mod stage;
pub mod warmup;

mod error;

pub use cache::{CacheLayer, LocalTier, RemoteTier, TieredCache};
pub use error::{Error, Result};
pub use metrics::RecorderMetrics;
pub use single_flight::{FlightGuard, SingleFlight};
pub use stage::{Stage, StageRun};
pub use warmup::WarmupReport;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use fedsearch_config::Config;
use fedsearch_domain::{ExecutionStatus, QueryResult, StageBudget};
use fedsearch_providers::{RemoteCacheClient, SolrClient, VectorClient};
use fedsearch_storage::{db::Db, models::NewQueryLog, queries};

use crate::metrics::MetricsSink;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Keyword search backend.
pub trait LexicalSearch
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String>>;

	fn facets<'a>(&'a self, field: &'a str, limit: u32) -> BoxFuture<'a, Result<String>>;
}

/// Vector similarity backend.
pub trait SemanticSearch
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, query: &'a str, top_k: u32) -> BoxFuture<'a, Result<String>>;
}

/// Shared key/value store backing the remote cache tier.
pub trait RemoteCache
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<QueryResult>>>;

	fn put<'a>(
		&'a self,
		key: &'a str,
		ttl_seconds: u64,
		value: &'a QueryResult,
	) -> BoxFuture<'a, Result<()>>;
}

pub trait QueryLog
where
	Self: Send + Sync,
{
	fn write<'a>(&'a self, entry: &'a QueryLogEntry) -> BoxFuture<'a, Result<()>>;
}

pub trait Metrics
where
	Self: Send + Sync,
{
	fn increment(&self, name: &'static str);

	fn record(&self, name: &'static str, duration: Duration);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLogEntry {
	pub query_text: String,
	pub top_k: u32,
	pub latency_ms: u64,
	pub status: ExecutionStatus,
}

/// Everything the orchestrator talks to. Optional collaborators are no-ops when absent.
#[derive(Clone)]
pub struct Collaborators {
	pub lexical: Arc<dyn LexicalSearch>,
	pub semantic: Arc<dyn SemanticSearch>,
	pub remote_cache: Option<Arc<dyn RemoteCache>>,
	pub query_log: Option<Arc<dyn QueryLog>>,
	pub metrics: Option<Arc<dyn Metrics>>,
}
impl Collaborators {
	pub fn new(lexical: Arc<dyn LexicalSearch>, semantic: Arc<dyn SemanticSearch>) -> Self {
		Self { lexical, semantic, remote_cache: None, query_log: None, metrics: None }
	}

	/// HTTP clients for both backends and the remote cache, plus the `metrics` recorder when
	/// enabled. The query log needs a database connection and is attached separately.
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let mut collaborators = Self::new(
			Arc::new(SolrClient::new(&cfg.lexical)?),
			Arc::new(VectorClient::new(&cfg.vector)?),
		);

		if cfg.cache.remote.enabled {
			collaborators.remote_cache = Some(Arc::new(RemoteCacheClient::new(&cfg.cache.remote)?));
		}
		if cfg.metrics.enabled {
			collaborators.metrics = Some(Arc::new(RecorderMetrics));
		}

		Ok(collaborators)
	}

	pub fn with_remote_cache(mut self, remote_cache: Arc<dyn RemoteCache>) -> Self {
		self.remote_cache = Some(remote_cache);

		self
	}

	pub fn with_query_log(mut self, query_log: Arc<dyn QueryLog>) -> Self {
		self.query_log = Some(query_log);

		self
	}

	pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
		self.metrics = Some(metrics);

		self
	}
}

pub struct FederationService {
	pub cfg: Config,
	pub collaborators: Collaborators,
	budget: StageBudget,
	cache: TieredCache,
	flights: SingleFlight,
	metrics: MetricsSink,
}
impl FederationService {
	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		let budget = StageBudget::allocate(
			cfg.execution.total_budget_ms,
			cfg.execution.vector_stage_budget_ms,
		);
		let remote = if cfg.cache.remote.enabled {
			RemoteTier::new(collaborators.remote_cache.clone(), cfg.cache.remote.ttl_seconds)
		} else {
			RemoteTier::disabled()
		};
		let cache = TieredCache::new(remote, LocalTier::from_config(&cfg.cache.local));
		let metrics = MetricsSink::new(collaborators.metrics.clone());

		Self { cfg, collaborators, budget, cache, flights: SingleFlight::default(), metrics }
	}

	pub fn budget(&self) -> StageBudget {
		self.budget
	}

	pub fn cache(&self) -> &TieredCache {
		&self.cache
	}

	/// Number of request keys currently holding or waiting on a single-flight slot.
	pub fn in_flight(&self) -> usize {
		self.flights.len()
	}
}

impl LexicalSearch for SolrClient {
	fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(SolrClient::search(self, query).await?) })
	}

	fn facets<'a>(&'a self, field: &'a str, limit: u32) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(SolrClient::facets(self, field, limit).await?) })
	}
}

impl SemanticSearch for VectorClient {
	fn search<'a>(&'a self, query: &'a str, top_k: u32) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(VectorClient::search(self, query, top_k).await?) })
	}
}

impl RemoteCache for RemoteCacheClient {
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<QueryResult>>> {
		Box::pin(async move { Ok(RemoteCacheClient::get(self, key).await?) })
	}

	fn put<'a>(
		&'a self,
		key: &'a str,
		ttl_seconds: u64,
		value: &'a QueryResult,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(RemoteCacheClient::put(self, key, ttl_seconds, value).await?) })
	}
}

impl QueryLog for Db {
	fn write<'a>(&'a self, entry: &'a QueryLogEntry) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let row = NewQueryLog {
				query_text: entry.query_text.clone(),
				top_k: i32::try_from(entry.top_k).unwrap_or(i32::MAX),
				latency_ms: i64::try_from(entry.latency_ms).unwrap_or(i64::MAX),
				status: entry.status.as_str().to_string(),
			};

			Ok(queries::insert_query_log(self, &row).await?)
		})
	}
}
