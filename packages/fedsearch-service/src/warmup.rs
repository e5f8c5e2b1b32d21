use std::time::Duration;

use fedsearch_domain::QueryRequest;

use crate::{FederationService, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmupReport {
	pub attempts: u32,
	pub succeeded: u32,
}

impl FederationService {
	/// Primes both backends and the caches with the configured probe query.
	///
	/// Each attempt touches the lexical backend, the vector backend, and then the full hybrid path.
	/// Failed attempts are logged and never abort startup.
	pub async fn run_warmup(&self) -> WarmupReport {
		let cfg = &self.cfg.warmup;
		let mut report = WarmupReport::default();

		if !cfg.enabled {
			return report;
		}

		let top_k = cfg.top_k.max(1);
		let attempts = cfg.attempts.max(1);
		let req = QueryRequest::new(cfg.query.clone()).with_top_k(i64::from(top_k));

		for attempt in 1..=attempts {
			report.attempts += 1;

			match self.warmup_attempt(&req, &cfg.query, top_k, attempt).await {
				Ok(()) => {
					report.succeeded += 1;

					tracing::info!(attempt, top_k, "Query warmup completed.");
				},
				Err(err) => {
					tracing::warn!(error = %err, attempt, "Query warmup attempt failed.");
				},
			}

			if attempt < attempts && cfg.delay_ms > 0 {
				tokio::time::sleep(Duration::from_millis(cfg.delay_ms)).await;
			}
		}

		report
	}

	async fn warmup_attempt(
		&self,
		req: &QueryRequest,
		query: &str,
		top_k: u32,
		attempt: u32,
	) -> Result<()> {
		self.collaborators.lexical.search(query).await?;
		self.collaborators.semantic.search(query, top_k).await?;

		let trace_id = format!("startup-warmup-{attempt}");

		self.execute_hybrid_search(req, Some(&trace_id)).await;

		Ok(())
	}
}
