use std::sync::Arc;

use fedsearch_config::Config;
use fedsearch_service::{Collaborators, FederationService};
use fedsearch_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FederationService>,
}
impl AppState {
	/// Wires the HTTP backends from `config` and, when configured, the Postgres query log.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let mut collaborators = Collaborators::from_config(&config)?;

		if let Some(query_log) = config.query_log.as_ref() {
			let db = Db::connect(query_log).await?;

			db.ensure_schema().await?;

			collaborators = collaborators.with_query_log(Arc::new(db));
		}

		Ok(Self::from_service(FederationService::with_collaborators(config, collaborators)))
	}

	pub fn from_service(service: FederationService) -> Self {
		Self { service: Arc::new(service) }
	}
}
