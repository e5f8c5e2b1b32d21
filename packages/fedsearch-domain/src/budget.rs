use std::time::Duration;

/// Floor below which a stage is not worth attempting.
pub const MIN_STAGE_BUDGET_MS: u64 = 25;
pub const MIN_TOTAL_BUDGET_MS: u64 = 100;

/// Per-request latency budget split across the lexical and vector stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageBudget {
	pub total_ms: u64,
	pub lexical_ms: u64,
	pub vector_ms: u64,
}
impl StageBudget {
	pub fn allocate(requested_total_ms: u64, requested_vector_ms: u64) -> Self {
		let total_ms = requested_total_ms.max(MIN_TOTAL_BUDGET_MS);
		let vector_ms =
			requested_vector_ms.min(total_ms - MIN_STAGE_BUDGET_MS).max(MIN_STAGE_BUDGET_MS);
		let lexical_ms = (total_ms - vector_ms).max(MIN_STAGE_BUDGET_MS);

		Self { total_ms, lexical_ms, vector_ms }
	}

	pub fn lexical_timeout(&self) -> Duration {
		Duration::from_millis(self.lexical_ms)
	}

	pub fn remaining_ms(&self, elapsed: Duration) -> u64 {
		let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

		self.total_ms.saturating_sub(elapsed_ms)
	}

	/// Timeout for the vector stage given the time already spent on the request, or `None` when
	/// too little of the total budget is left to attempt it.
	pub fn vector_timeout(&self, elapsed: Duration) -> Option<Duration> {
		let remaining_ms = self.remaining_ms(elapsed);

		if remaining_ms < MIN_STAGE_BUDGET_MS {
			return None;
		}

		Some(Duration::from_millis(self.vector_ms.min(remaining_ms)))
	}
}
