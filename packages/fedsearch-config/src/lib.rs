mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, Execution, Lexical, LocalCache, Metrics, Query, QueryLog, RemoteCache, Service,
	Vector, Warmup,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.query.default_top_k == 0 {
		return Err(Error::Validation {
			message: "query.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.local.max_entries == 0 {
		return Err(Error::Validation {
			message: "cache.local.max_entries must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.local.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.local.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.remote.enabled {
		if cfg.cache.remote.url.trim().is_empty() {
			return Err(Error::Validation {
				message: "cache.remote.url must be non-empty when enabled.".to_string(),
			});
		}
		if cfg.cache.remote.ttl_seconds == 0 {
			return Err(Error::Validation {
				message: "cache.remote.ttl_seconds must be greater than zero.".to_string(),
			});
		}
	}

	for (label, url) in [("lexical.url", &cfg.lexical.url), ("vector.url", &cfg.vector.url)] {
		if url.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}
	for (label, timeout_ms) in [
		("lexical.timeout_ms", cfg.lexical.timeout_ms),
		("vector.timeout_ms", cfg.vector.timeout_ms),
		("cache.remote.timeout_ms", cfg.cache.remote.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.lexical.rows == 0 {
		return Err(Error::Validation {
			message: "lexical.rows must be greater than zero.".to_string(),
		});
	}

	if let Some(query_log) = cfg.query_log.as_ref()
		&& query_log.pool_max_conns == 0
	{
		return Err(Error::Validation {
			message: "query_log.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	if cfg.warmup.enabled {
		if cfg.warmup.attempts == 0 {
			return Err(Error::Validation {
				message: "warmup.attempts must be greater than zero when enabled.".to_string(),
			});
		}
		if cfg.warmup.query.trim().is_empty() {
			return Err(Error::Validation {
				message: "warmup.query must be non-empty when enabled.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.query_log.as_ref().map(|query_log| query_log.dsn.trim().is_empty()).unwrap_or(false) {
		cfg.query_log = None;
	}
	if cfg.metrics.prometheus_bind.as_deref().map(|bind| bind.trim().is_empty()).unwrap_or(false)
	{
		cfg.metrics.prometheus_bind = None;
	}

	cfg.warmup.top_k = cfg.warmup.top_k.max(1);
}
