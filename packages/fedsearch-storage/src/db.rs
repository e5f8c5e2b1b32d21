use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

/// Query-log writes are fire-and-forget; an unreachable database must drop them quickly.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &fedsearch_config::QueryLog) -> Result<Self> {
		let pool = pool_options(cfg).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let lock_id: i64 = 8_095_001;
		// Advisory locks are held per connection, so scope this one to a single transaction.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in schema::statements() {
			sqlx::query(statement).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

fn pool_options(cfg: &fedsearch_config::QueryLog) -> PgPoolOptions {
	PgPoolOptions::new()
		.max_connections(cfg.pool_max_conns.max(1))
		.acquire_timeout(ACQUIRE_TIMEOUT)
}
