use reqwest::Client;

use crate::Result;

const SEARCH_PATH: &str = "/api/vector/search";

#[derive(Debug, Clone)]
pub struct VectorClient {
	client: Client,
	search_url: String,
}
impl VectorClient {
	pub fn new(cfg: &fedsearch_config::Vector) -> Result<Self> {
		Ok(Self {
			client: crate::http_client(cfg.timeout_ms)?,
			search_url: crate::join_url(&cfg.url, SEARCH_PATH),
		})
	}

	/// Returns the raw JSON array of similarity hits.
	pub async fn search(&self, query: &str, top_k: u32) -> Result<String> {
		let top_k = top_k.to_string();
		let res = self
			.client
			.get(&self.search_url)
			.query(&[("query", query), ("topK", top_k.as_str())])
			.send()
			.await?;

		Ok(res.error_for_status()?.text().await?)
	}
}
