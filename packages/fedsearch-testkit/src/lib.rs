//! Test doubles and database helpers shared by the workspace's integration tests.

mod error;
pub mod fakes;

pub use error::{Error, Result};
pub use fakes::{
	FakeLexical, FakeSemantic, MemoryRemoteCache, Reply, SpyMetrics, SpyQueryLog, lexical_docs,
	vector_hits,
};

use std::{env, str::FromStr, thread};

use fedsearch_config::Config;
use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];
const SAMPLE_CONFIG: &str = r#"
[service]
http_bind = "127.0.0.1:0"

[execution]
total_budget_ms        = 350
vector_stage_budget_ms = 120

[query]
default_top_k = 20

[cache.local]
enabled     = true
ttl_seconds = 120
max_entries = 5000

[cache.remote]
enabled     = true
url         = "http://127.0.0.1:1"
ttl_seconds = 120
timeout_ms  = 100

[lexical]
url = "http://127.0.0.1:1/solr/documents"

[vector]
url = "http://127.0.0.1:1"

[metrics]
enabled = false
"#;

/// Valid configuration pointing at unroutable backends. Tests swap in fakes and tweak fields.
pub fn sample_config() -> Result<Config> {
	fedsearch_config::parse(SAMPLE_CONFIG)
		.map_err(|err| Error::Message(format!("Failed to parse sample config: {err}.")))
}

pub fn env_dsn() -> Option<String> {
	env::var("FEDSEARCH_PG_DSN").ok()
}

/// A throwaway Postgres database created from `FEDSEARCH_PG_DSN` and dropped afterwards.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse FEDSEARCH_PG_DSN: {err}.")))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("fedsearch_test_{}", Uuid::new_v4().simple());
		let create_sql = format!(r#"CREATE DATABASE "{name}""#);

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		let dsn = base_options.clone().database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, cleaned: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		cleanup_database(&self.name, &self.admin_options).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test database cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(cleanup_database(&name, &admin_options)) {
				eprintln!("Test database cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => {
				last_err = Some(err);
			},
		}
	}

	Err(Error::Message(format!("Failed to connect to an admin database: {last_err:?}.")))
}

async fn cleanup_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await.map_err(|err| {
		Error::Message(format!("Failed to connect to admin database for cleanup: {err}."))
	})?;
	let drop_sql = format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#);

	conn.execute(drop_sql.as_str())
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}
