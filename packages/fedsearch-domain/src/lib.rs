pub mod budget;
pub mod fusion;
pub mod query;
pub mod result;
pub mod signal;
pub mod status;

pub use budget::{MIN_STAGE_BUDGET_MS, MIN_TOTAL_BUDGET_MS, StageBudget};
pub use fusion::{LEXICAL_WEIGHT, SEMANTIC_WEIGHT, fuse_and_rank};
pub use query::{QueryMode, QueryRequest, ResolvedQuery, ResultFilter};
pub use result::{
	EMPTY_FACETS_RESPONSE, EMPTY_LEXICAL_RESPONSE, EMPTY_VECTOR_RESPONSE, QueryResult,
	RankedResult,
};
pub use signal::{DocSignal, parse_lexical_signals, parse_vector_signals};
pub use status::{ExecutionStatus, StageOutcome};
