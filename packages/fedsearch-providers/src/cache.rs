//! Client for the shared key/value caching service.

use fedsearch_domain::QueryResult;
use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

const KEY_PREFIX: &str = "hybrid:query:";
const GET_PATH: &str = "/cache/get";
const PUT_PATH: &str = "/cache/put";

#[derive(Debug, Clone)]
pub struct RemoteCacheClient {
	client: Client,
	get_url: String,
	put_url: String,
}
impl RemoteCacheClient {
	pub fn new(cfg: &fedsearch_config::RemoteCache) -> Result<Self> {
		Ok(Self {
			client: crate::http_client(cfg.timeout_ms)?,
			get_url: crate::join_url(&cfg.url, GET_PATH),
			put_url: crate::join_url(&cfg.url, PUT_PATH),
		})
	}

	pub async fn get(&self, request_key: &str) -> Result<Option<QueryResult>> {
		let key = remote_key(request_key);
		let res = self.client.get(&self.get_url).query(&[("key", key.as_str())]).send().await?;
		let body = res.error_for_status()?.text().await?;

		decode_cached_result(&body)
	}

	pub async fn put(&self, request_key: &str, ttl_seconds: u64, result: &QueryResult) -> Result<()> {
		let key = remote_key(request_key);
		let ttl = ttl_seconds.max(1).to_string();

		self.client
			.post(&self.put_url)
			.query(&[("key", key.as_str()), ("ttl", ttl.as_str())])
			.json(result)
			.send()
			.await?
			.error_for_status()?;

		Ok(())
	}
}

/// Namespaced remote key. Hashing keeps arbitrary query text out of the cache key space.
pub fn remote_key(request_key: &str) -> String {
	format!("{KEY_PREFIX}{}", blake3::hash(request_key.as_bytes()).to_hex())
}

/// Decodes a cache service response. Blank bodies and `null` are misses; a `{"value": ...}`
/// wrapper is unwrapped.
pub fn decode_cached_result(body: &str) -> Result<Option<QueryResult>> {
	let body = body.trim();

	if body.is_empty() || body == "null" {
		return Ok(None);
	}

	let root: Value = serde_json::from_str(body)?;
	let value = match root {
		Value::Null => return Ok(None),
		Value::Object(mut object) if !object.contains_key("message") && object.contains_key("value") =>
			object.remove("value").unwrap_or(Value::Null),
		other => other,
	};

	match value {
		Value::Null => Ok(None),
		Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
		_ => Err(Error::InvalidResponse {
			message: "Cached value must be a JSON object.".to_string(),
		}),
	}
}
