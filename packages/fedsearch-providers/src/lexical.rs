use reqwest::Client;

use crate::Result;

const SELECT_PATH: &str = "/select";
const SEARCH_FIELDS: &str = "id,title,score";

/// Solr-compatible keyword search backend.
#[derive(Debug, Clone)]
pub struct SolrClient {
	client: Client,
	select_url: String,
	rows: u32,
}
impl SolrClient {
	pub fn new(cfg: &fedsearch_config::Lexical) -> Result<Self> {
		Ok(Self {
			client: crate::http_client(cfg.timeout_ms)?,
			select_url: crate::join_url(&cfg.url, SELECT_PATH),
			rows: cfg.rows.max(1),
		})
	}

	pub fn select_url(&self) -> &str {
		&self.select_url
	}

	/// Returns the raw `select` response body.
	pub async fn search(&self, query: &str) -> Result<String> {
		let rows = self.rows.to_string();
		let res = self
			.client
			.get(&self.select_url)
			.query(&[("q", query), ("fl", SEARCH_FIELDS), ("rows", rows.as_str()), ("wt", "json")])
			.send()
			.await?;

		Ok(res.error_for_status()?.text().await?)
	}

	/// Returns the raw facet response for `field` over the whole index.
	pub async fn facets(&self, field: &str, limit: u32) -> Result<String> {
		let limit = limit.to_string();
		let res = self
			.client
			.get(&self.select_url)
			.query(&[
				("q", "*:*"),
				("rows", "0"),
				("wt", "json"),
				("facet", "true"),
				("facet.field", field),
				("facet.limit", limit.as_str()),
			])
			.send()
			.await?;

		Ok(res.error_for_status()?.text().await?)
	}
}
