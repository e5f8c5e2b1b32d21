use fedsearch_service::WarmupReport;
use fedsearch_testkit::{FakeLexical, FakeSemantic, MemoryRemoteCache, lexical_docs, vector_hits};

use super::{harness, harness_with, test_config};

fn warmup_config(attempts: u32) -> fedsearch_config::Config {
	let mut cfg = test_config();

	cfg.warmup.enabled = true;
	cfg.warmup.attempts = attempts;
	cfg.warmup.delay_ms = 0;

	cfg
}

#[tokio::test]
async fn disabled_warmup_does_nothing() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[])),
		FakeSemantic::returning(vector_hits(&[])),
	);

	assert_eq!(h.service.run_warmup().await, WarmupReport::default());
	assert_eq!(h.lexical.calls(), 0);
}

#[tokio::test]
async fn warmup_primes_backends_and_cache() {
	let h = harness_with(
		warmup_config(2),
		FakeLexical::returning(lexical_docs(&[("doc-1", "One", 1.0)])),
		FakeSemantic::returning(vector_hits(&[("doc-1", 0.5)])),
		MemoryRemoteCache::default(),
	);
	let report = h.service.run_warmup().await;

	assert_eq!(report, WarmupReport { attempts: 2, succeeded: 2 });
	// Two direct probes plus one hybrid execution; the second hybrid call is a cache hit.
	assert_eq!(h.lexical.calls(), 3);
	assert_eq!(h.semantic.last_top_k(), 1);
	assert_eq!(h.remote.len(), 1);
}

#[tokio::test]
async fn failed_attempts_are_counted_not_raised() {
	let h = harness_with(
		warmup_config(3),
		FakeLexical::returning(lexical_docs(&[])),
		FakeSemantic::failing("vector down"),
		MemoryRemoteCache::default(),
	);
	let report = h.service.run_warmup().await;

	assert_eq!(report, WarmupReport { attempts: 3, succeeded: 0 });
	assert_eq!(h.lexical.calls(), 3);
	assert!(h.remote.is_empty());
}
