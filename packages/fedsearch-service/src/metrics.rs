//! Metric names and sinks. Durations are recorded in milliseconds.

use std::{sync::Arc, time::Duration};

use crate::Metrics;

pub const REMOTE_CACHE_HIT: &str = "query_result_redis_cache_hit_total";
pub const REMOTE_CACHE_MISS: &str = "query_result_redis_cache_miss_total";
pub const LOCAL_CACHE_HIT: &str = "query_result_inmemory_cache_hit_total";
pub const LOCAL_CACHE_MISS: &str = "query_result_inmemory_cache_miss_total";
pub const STAGE_TIMEOUT: &str = "query_stage_timeout_total";
pub const STAGE_ERROR: &str = "query_stage_error_total";
pub const VECTOR_STAGE_SKIPPED_BUDGET: &str = "vector_stage_skipped_budget_total";
pub const HYBRID_QUERY_COUNT: &str = "hybrid_query_count_total";
pub const LEXICAL_QUERY_LATENCY: &str = "solr_query_latency_ms";
pub const VECTOR_QUERY_LATENCY: &str = "vector_query_latency_ms";
pub const RANKING_MERGE_DURATION: &str = "ranking_merge_duration_ms";

/// Forwards to whatever recorder is installed for the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecorderMetrics;
impl Metrics for RecorderMetrics {
	fn increment(&self, name: &'static str) {
		::metrics::counter!(name).increment(1);
	}

	fn record(&self, name: &'static str, duration: Duration) {
		::metrics::histogram!(name).record(duration.as_secs_f64() * 1_000.0);
	}
}

#[derive(Clone, Default)]
pub(crate) struct MetricsSink(Option<Arc<dyn Metrics>>);
impl MetricsSink {
	pub(crate) fn new(metrics: Option<Arc<dyn Metrics>>) -> Self {
		Self(metrics)
	}

	pub(crate) fn increment(&self, name: &'static str) {
		if let Some(metrics) = self.0.as_ref() {
			metrics.increment(name);
		}
	}

	pub(crate) fn record(&self, name: &'static str, duration: Duration) {
		if let Some(metrics) = self.0.as_ref() {
			metrics.record(name, duration);
		}
	}
}
