use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub execution: Execution,
	#[serde(default)]
	pub query: Query,
	#[serde(default)]
	pub cache: Cache,
	pub lexical: Lexical,
	pub vector: Vector,
	pub query_log: Option<QueryLog>,
	#[serde(default)]
	pub metrics: Metrics,
	#[serde(default)]
	pub warmup: Warmup,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Requested latency budgets. The allocator clamps them, so out-of-range values are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Execution {
	pub total_budget_ms: u64,
	pub vector_stage_budget_ms: u64,
}
impl Default for Execution {
	fn default() -> Self {
		Self { total_budget_ms: 350, vector_stage_budget_ms: 120 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Query {
	pub default_top_k: u32,
}
impl Default for Query {
	fn default() -> Self {
		Self { default_top_k: 20 }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub local: LocalCache,
	pub remote: RemoteCache,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalCache {
	pub enabled: bool,
	pub ttl_seconds: u64,
	pub max_entries: usize,
}
impl Default for LocalCache {
	fn default() -> Self {
		Self { enabled: true, ttl_seconds: 120, max_entries: 5_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteCache {
	pub enabled: bool,
	pub url: String,
	pub ttl_seconds: u64,
	pub timeout_ms: u64,
}
impl Default for RemoteCache {
	fn default() -> Self {
		Self {
			enabled: true,
			url: "http://caching-service:8096".to_string(),
			ttl_seconds: 120,
			timeout_ms: 100,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lexical {
	pub url: String,
	#[serde(default = "default_client_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_lexical_rows")]
	pub rows: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vector {
	pub url: String,
	#[serde(default = "default_client_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryLog {
	pub dsn: String,
	#[serde(default = "default_pool_max_conns")]
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Metrics {
	pub enabled: bool,
	/// Optional. Address for the Prometheus scrape endpoint.
	pub prometheus_bind: Option<String>,
}
impl Default for Metrics {
	fn default() -> Self {
		Self { enabled: true, prometheus_bind: None }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Warmup {
	pub enabled: bool,
	pub query: String,
	pub top_k: u32,
	pub attempts: u32,
	pub delay_ms: u64,
}
impl Default for Warmup {
	fn default() -> Self {
		Self {
			enabled: false,
			query: "startup warmup probe".to_string(),
			top_k: 1,
			attempts: 2,
			delay_ms: 2_000,
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_client_timeout_ms() -> u64 {
	120
}

fn default_lexical_rows() -> u32 {
	50
}

fn default_pool_max_conns() -> u32 {
	4
}
