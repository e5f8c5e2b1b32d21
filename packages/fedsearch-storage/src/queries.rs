use crate::{
	Error, Result,
	db::Db,
	models::{NewQueryLog, QueryLogRow},
};

pub async fn insert_query_log(db: &Db, entry: &NewQueryLog) -> Result<()> {
	if entry.status.trim().is_empty() {
		return Err(Error::InvalidArgument("Query log status must be non-empty.".to_string()));
	}

	sqlx::query(
		"\
INSERT INTO query_logs (query_text, top_k, latency_ms, status)
VALUES ($1, $2, $3, $4)",
	)
	.bind(entry.query_text.as_str())
	.bind(entry.top_k)
	.bind(entry.latency_ms.max(0))
	.bind(entry.status.as_str())
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn recent_query_logs(db: &Db, limit: i64) -> Result<Vec<QueryLogRow>> {
	let rows = sqlx::query_as::<_, QueryLogRow>(
		"\
SELECT id, query_text, top_k, latency_ms, status
FROM query_logs
ORDER BY created_at DESC, id DESC
LIMIT $1",
	)
	.bind(limit.max(1))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
