//! Hybrid query orchestration: cache lookup, single-flight, budgeted stages, fusion, cache write.

use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use fedsearch_domain::{
	EMPTY_LEXICAL_RESPONSE, EMPTY_VECTOR_RESPONSE, ExecutionStatus, QueryRequest, QueryResult,
	ResolvedQuery, ResultFilter, fuse_and_rank, parse_lexical_signals, parse_vector_signals,
};
use uuid::Uuid;

use crate::{
	CacheLayer, FederationService, QueryLogEntry, Stage, StageRun, metrics, stage::run_stage,
};

const LOG_QUERY_MAX_CHARS: usize = 120;

impl FederationService {
	/// Answers one hybrid query. Never fails: downstream problems degrade the result instead.
	///
	/// A blank `trace_id` is replaced with a random one.
	pub async fn execute_hybrid_search(
		&self,
		req: &QueryRequest,
		trace_id: Option<&str>,
	) -> QueryResult {
		let trace_id = resolve_trace_id(trace_id);
		let started = Instant::now();
		let query = ResolvedQuery::resolve(req, self.cfg.query.default_top_k);
		let key = query.request_key();

		tracing::info!(
			trace_id = %trace_id,
			query = %log_preview(&query.text),
			top_k = query.top_k,
			mode = query.mode.as_str(),
			filter = query.filter.as_str(),
			"Query started."
		);

		if let Some(hit) = self.cached(&query, &key, &trace_id, started, true).await {
			return hit;
		}

		let _flight = self.flights.acquire(&key).await;

		// Another caller may have filled the cache while this one waited.
		if let Some(hit) = self.cached(&query, &key, &trace_id, started, false).await {
			return hit;
		}

		self.execute_and_cache(&query, &key, &trace_id, started).await
	}

	async fn cached(
		&self,
		query: &ResolvedQuery,
		key: &str,
		trace_id: &str,
		started: Instant,
		count_misses: bool,
	) -> Option<QueryResult> {
		let Some((layer, hit)) = self.cache.get(key).await else {
			if count_misses {
				self.metrics.increment(metrics::REMOTE_CACHE_MISS);
				self.metrics.increment(metrics::LOCAL_CACHE_MISS);
			}

			return None;
		};

		match layer {
			CacheLayer::Remote => self.metrics.increment(metrics::REMOTE_CACHE_HIT),
			CacheLayer::Local => {
				if count_misses {
					self.metrics.increment(metrics::REMOTE_CACHE_MISS);
				}

				self.metrics.increment(metrics::LOCAL_CACHE_HIT);
			},
		}

		Some(self.finish_cache_hit(query, trace_id, started, layer, hit))
	}

	fn finish_cache_hit(
		&self,
		query: &ResolvedQuery,
		trace_id: &str,
		started: Instant,
		layer: CacheLayer,
		hit: QueryResult,
	) -> QueryResult {
		tracing::info!(
			trace_id = %trace_id,
			cache_layer = layer.as_str(),
			total_ms = elapsed_ms(started.elapsed()),
			"Query cache hit."
		);

		self.write_query_log(query, started, layer.hit_status());

		hit
	}

	async fn execute_and_cache(
		&self,
		query: &ResolvedQuery,
		key: &str,
		trace_id: &str,
		started: Instant,
	) -> QueryResult {
		let lexical = self.run_lexical_stage(query).await;

		log_stage(trace_id, Stage::Lexical, &lexical);

		let vector = self.run_vector_stage(query, started).await;

		log_stage(trace_id, Stage::Vector, &vector);

		let parse_started = Instant::now();
		let lexical_signals = parse_lexical_signals(&lexical.payload);
		let semantic_signals = parse_vector_signals(&vector.payload);

		tracing::info!(
			trace_id = %trace_id,
			stage = "parse_signals",
			duration_ms = elapsed_ms(parse_started.elapsed()),
			lexical_docs = lexical_signals.len(),
			semantic_docs = semantic_signals.len(),
			"Signals parsed."
		);

		let fusion_started = Instant::now();
		let ranked_results = fuse_and_rank(
			&lexical_signals,
			&semantic_signals,
			query.top_k as usize,
			query.mode,
			query.filter,
		);
		let fusion_elapsed = fusion_started.elapsed();

		self.metrics.record(metrics::RANKING_MERGE_DURATION, fusion_elapsed);

		tracing::info!(
			trace_id = %trace_id,
			stage = "fusion",
			duration_ms = elapsed_ms(fusion_elapsed),
			ranked_docs = ranked_results.len(),
			"Signals fused."
		);

		self.metrics.increment(metrics::HYBRID_QUERY_COUNT);

		let mut result = QueryResult {
			message: query.summary_message(),
			lexical_payload: lexical.payload,
			vector_payload: vector.payload,
			ranked_results,
		};

		match query.filter {
			ResultFilter::LexicalOnly => result.vector_payload = EMPTY_VECTOR_RESPONSE.to_string(),
			ResultFilter::VectorOnly => result.lexical_payload = EMPTY_LEXICAL_RESPONSE.to_string(),
			ResultFilter::None => {},
		}

		self.cache.put(key, &result).await;

		let status = ExecutionStatus::from_outcomes(&query.text, lexical.outcome, vector.outcome);

		tracing::info!(
			trace_id = %trace_id,
			total_ms = elapsed_ms(started.elapsed()),
			top_k = query.top_k,
			status = status.as_str(),
			"Query completed."
		);

		self.write_query_log(query, started, status);

		result
	}

	async fn run_lexical_stage(&self, query: &ResolvedQuery) -> StageRun {
		let backend = Arc::clone(&self.collaborators.lexical);
		let text = query.text.clone();

		run_stage(Stage::Lexical, self.budget.lexical_timeout(), &self.metrics, async move {
			backend.search(&text).await
		})
		.await
	}

	async fn run_vector_stage(&self, query: &ResolvedQuery, started: Instant) -> StageRun {
		let Some(timeout) = self.budget.vector_timeout(started.elapsed()) else {
			self.metrics.increment(metrics::VECTOR_STAGE_SKIPPED_BUDGET);

			return StageRun::skipped(Stage::Vector);
		};
		let backend = Arc::clone(&self.collaborators.semantic);
		let text = query.text.clone();
		let top_k = query.top_k;

		run_stage(Stage::Vector, timeout, &self.metrics, async move {
			backend.search(&text, top_k).await
		})
		.await
	}

	/// Fire-and-forget: the caller never waits on the sink.
	fn write_query_log(&self, query: &ResolvedQuery, started: Instant, status: ExecutionStatus) {
		let Some(sink) = self.collaborators.query_log.clone() else {
			return;
		};
		let entry = QueryLogEntry {
			query_text: query.text.clone(),
			top_k: query.top_k,
			latency_ms: elapsed_ms(started.elapsed()),
			status,
		};

		tokio::spawn(async move {
			if let Err(err) = sink.write(&entry).await {
				tracing::debug!(
					error = %err,
					status = entry.status.as_str(),
					"Query log write failed."
				);
			}
		});
	}
}

fn resolve_trace_id(trace_id: Option<&str>) -> String {
	match trace_id.map(str::trim) {
		Some(trace_id) if !trace_id.is_empty() => trace_id.to_string(),
		_ => Uuid::new_v4().to_string(),
	}
}

fn elapsed_ms(elapsed: Duration) -> u64 {
	u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn log_stage(trace_id: &str, stage: Stage, run: &StageRun) {
	tracing::info!(
		trace_id = %trace_id,
		stage = stage.as_str(),
		duration_ms = run.duration_ms(),
		outcome = run.outcome.as_str(),
		payload_bytes = run.payload.len(),
		"Query stage finished."
	);
}

/// Collapses whitespace and caps the text so log lines stay bounded.
pub fn log_preview(text: &str) -> String {
	let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

	if collapsed.chars().count() <= LOG_QUERY_MAX_CHARS {
		return collapsed;
	}

	let mut preview: String = collapsed.chars().take(LOG_QUERY_MAX_CHARS).collect();

	preview.push_str("...");

	preview
}
