#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	Success,
	Timeout,
	Error,
	SkippedBudget,
}
impl StageOutcome {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "SUCCESS",
			Self::Timeout => "TIMEOUT",
			Self::Error => "ERROR",
			Self::SkippedBudget => "SKIPPED_BUDGET",
		}
	}
}

/// Label recorded in the query log for every answered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
	Success,
	EmptyQuery,
	PartialLexicalTimeout,
	PartialVectorTimeout,
	PartialDownstreamError,
	CacheHitRemote,
	CacheHitLocal,
}
impl ExecutionStatus {
	/// First match wins: blank query, lexical timeout, vector timeout or skip, any error.
	pub fn from_outcomes(query: &str, lexical: StageOutcome, vector: StageOutcome) -> Self {
		if query.trim().is_empty() {
			return Self::EmptyQuery;
		}
		if lexical == StageOutcome::Timeout {
			return Self::PartialLexicalTimeout;
		}
		if matches!(vector, StageOutcome::Timeout | StageOutcome::SkippedBudget) {
			return Self::PartialVectorTimeout;
		}
		if lexical == StageOutcome::Error || vector == StageOutcome::Error {
			return Self::PartialDownstreamError;
		}

		Self::Success
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "SUCCESS",
			Self::EmptyQuery => "EMPTY_QUERY",
			Self::PartialLexicalTimeout => "PARTIAL_LEXICAL_TIMEOUT",
			Self::PartialVectorTimeout => "PARTIAL_VECTOR_TIMEOUT",
			Self::PartialDownstreamError => "PARTIAL_DOWNSTREAM_ERROR",
			Self::CacheHitRemote => "CACHE_HIT_REDIS",
			Self::CacheHitLocal => "CACHE_HIT_INMEMORY",
		}
	}
}
