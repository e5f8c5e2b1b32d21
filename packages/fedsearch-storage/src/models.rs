#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQueryLog {
	pub query_text: String,
	pub top_k: i32,
	pub latency_ms: i64,
	pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct QueryLogRow {
	pub id: i64,
	pub query_text: String,
	pub top_k: i32,
	pub latency_ms: i64,
	pub status: String,
}
