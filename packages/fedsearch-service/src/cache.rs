//! Two cache tiers checked remote first, then local.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use fedsearch_config::LocalCache;
use fedsearch_domain::{ExecutionStatus, QueryResult};

use crate::RemoteCache;

const MIN_LOCAL_TTL: Duration = Duration::from_secs(1);
const MIN_LOCAL_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLayer {
	Remote,
	Local,
}
impl CacheLayer {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Remote => "redis",
			Self::Local => "inmemory",
		}
	}

	pub fn hit_status(self) -> ExecutionStatus {
		match self {
			Self::Remote => ExecutionStatus::CacheHitRemote,
			Self::Local => ExecutionStatus::CacheHitLocal,
		}
	}
}

struct CacheEntry {
	value: QueryResult,
	expires_at: Instant,
}

/// In-process tier. Reaching capacity clears the whole tier before the next insert.
pub struct LocalTier {
	enabled: bool,
	ttl: Duration,
	max_entries: usize,
	entries: Mutex<HashMap<String, CacheEntry>>,
}
impl LocalTier {
	pub fn new(enabled: bool, ttl: Duration, max_entries: usize) -> Self {
		Self { enabled, ttl, max_entries: max_entries.max(1), entries: Mutex::new(HashMap::new()) }
	}

	pub fn from_config(cfg: &LocalCache) -> Self {
		Self::new(
			cfg.enabled,
			Duration::from_secs(cfg.ttl_seconds).max(MIN_LOCAL_TTL),
			cfg.max_entries.max(MIN_LOCAL_ENTRIES),
		)
	}

	pub fn disabled() -> Self {
		Self::new(false, MIN_LOCAL_TTL, MIN_LOCAL_ENTRIES)
	}

	pub fn get(&self, key: &str) -> Option<QueryResult> {
		if !self.enabled {
			return None;
		}

		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let entry = entries.get(key)?;

		if entry.expires_at > Instant::now() {
			return Some(entry.value.clone());
		}

		entries.remove(key);

		None
	}

	pub fn put(&self, key: &str, value: &QueryResult) {
		if !self.enabled {
			return;
		}

		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		if entries.len() >= self.max_entries {
			entries.clear();
		}

		entries.insert(
			key.to_string(),
			CacheEntry { value: value.clone(), expires_at: Instant::now() + self.ttl },
		);
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Shared tier backed by the external caching service. Failures are logged and read as misses.
pub struct RemoteTier {
	client: Option<Arc<dyn RemoteCache>>,
	ttl_seconds: u64,
}
impl RemoteTier {
	pub fn new(client: Option<Arc<dyn RemoteCache>>, ttl_seconds: u64) -> Self {
		Self { client, ttl_seconds: ttl_seconds.max(1) }
	}

	pub fn disabled() -> Self {
		Self { client: None, ttl_seconds: 1 }
	}

	pub async fn get(&self, key: &str) -> Option<QueryResult> {
		let client = self.client.as_ref()?;

		match client.get(key).await {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_layer = CacheLayer::Remote.as_str(),
					"Remote cache read failed."
				);

				None
			},
		}
	}

	pub async fn put(&self, key: &str, value: &QueryResult) {
		let Some(client) = self.client.as_ref() else {
			return;
		};

		if let Err(err) = client.put(key, self.ttl_seconds, value).await {
			tracing::warn!(
				error = %err,
				cache_layer = CacheLayer::Remote.as_str(),
				"Remote cache write failed."
			);
		}
	}
}

pub struct TieredCache {
	pub remote: RemoteTier,
	pub local: LocalTier,
}
impl TieredCache {
	pub fn new(remote: RemoteTier, local: LocalTier) -> Self {
		Self { remote, local }
	}

	/// Read-through lookup. A hit reports the tier that answered; a local hit implies a remote miss.
	pub async fn get(&self, key: &str) -> Option<(CacheLayer, QueryResult)> {
		if let Some(value) = self.remote.get(key).await {
			return Some((CacheLayer::Remote, value));
		}

		self.local.get(key).map(|value| (CacheLayer::Local, value))
	}

	/// Writes both tiers, remote first.
	pub async fn put(&self, key: &str, value: &QueryResult) {
		self.remote.put(key, value).await;
		self.local.put(key, value);
	}
}
