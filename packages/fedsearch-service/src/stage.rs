use std::{
	future::Future,
	time::{Duration, Instant},
};

use fedsearch_domain::{
	EMPTY_LEXICAL_RESPONSE, EMPTY_VECTOR_RESPONSE, MIN_STAGE_BUDGET_MS, StageOutcome,
};

use crate::{
	Result,
	metrics::{self, MetricsSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Lexical,
	Vector,
}
impl Stage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lexical => "lexical_search",
			Self::Vector => "vector_search",
		}
	}

	/// Payload used whenever the stage produces nothing usable.
	pub fn fallback(self) -> &'static str {
		match self {
			Self::Lexical => EMPTY_LEXICAL_RESPONSE,
			Self::Vector => EMPTY_VECTOR_RESPONSE,
		}
	}

	fn latency_metric(self) -> &'static str {
		match self {
			Self::Lexical => metrics::LEXICAL_QUERY_LATENCY,
			Self::Vector => metrics::VECTOR_QUERY_LATENCY,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRun {
	pub payload: String,
	pub duration: Duration,
	pub outcome: StageOutcome,
}
impl StageRun {
	pub fn skipped(stage: Stage) -> Self {
		Self {
			payload: stage.fallback().to_string(),
			duration: Duration::ZERO,
			outcome: StageOutcome::SkippedBudget,
		}
	}

	pub fn duration_ms(&self) -> u64 {
		u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
	}
}

/// Runs `call` as its own task and waits at most `timeout` (floored at the minimum stage budget).
///
/// A call that outlives the deadline keeps running detached and its result is dropped. Failures
/// never propagate: they become an outcome plus the stage fallback payload.
pub(crate) async fn run_stage<F>(
	stage: Stage,
	timeout: Duration,
	sink: &MetricsSink,
	call: F,
) -> StageRun
where
	F: Future<Output = Result<String>> + Send + 'static,
{
	let started = Instant::now();
	let deadline = timeout.max(Duration::from_millis(MIN_STAGE_BUDGET_MS));
	let handle = tokio::spawn(call);
	let (payload, outcome) = match tokio::time::timeout(deadline, handle).await {
		Ok(Ok(Ok(payload))) if !payload.trim().is_empty() => (payload, StageOutcome::Success),
		Ok(Ok(Ok(_))) => (stage.fallback().to_string(), StageOutcome::Success),
		Ok(Ok(Err(err))) => {
			tracing::warn!(error = %err, stage = stage.as_str(), "Query stage failed.");
			sink.increment(metrics::STAGE_ERROR);

			(stage.fallback().to_string(), StageOutcome::Error)
		},
		Ok(Err(err)) => {
			tracing::warn!(error = %err, stage = stage.as_str(), "Query stage task aborted.");
			sink.increment(metrics::STAGE_ERROR);

			(stage.fallback().to_string(), StageOutcome::Error)
		},
		Err(_) => {
			sink.increment(metrics::STAGE_TIMEOUT);

			(stage.fallback().to_string(), StageOutcome::Timeout)
		},
	};
	let duration = started.elapsed();

	sink.record(stage.latency_metric(), duration);

	StageRun { payload, duration, outcome }
}
