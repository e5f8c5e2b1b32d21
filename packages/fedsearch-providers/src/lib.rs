pub mod cache;
pub mod error;
pub mod lexical;
pub mod vector;

pub use cache::RemoteCacheClient;
pub use error::{Error, Result};
pub use lexical::SolrClient;
pub use vector::VectorClient;

use std::time::Duration;

use reqwest::Client;

/// Lowest request timeout any downstream client is built with.
pub const MIN_CLIENT_TIMEOUT_MS: u64 = 50;

pub(crate) fn http_client(timeout_ms: u64) -> Result<Client> {
	let client = Client::builder()
		.timeout(Duration::from_millis(timeout_ms.max(MIN_CLIENT_TIMEOUT_MS)))
		.build()?;

	Ok(client)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
	format!("{}{path}", base.trim_end_matches('/'))
}
