use std::sync::Arc;

use fedsearch_domain::{ExecutionStatus, QueryRequest};
use fedsearch_service::{Collaborators, FederationService, metrics};
use fedsearch_testkit::{FakeLexical, FakeSemantic, MemoryRemoteCache, lexical_docs, vector_hits};

use super::{harness, harness_with, test_config};

fn backends() -> (FakeLexical, FakeSemantic) {
	(
		FakeLexical::returning(lexical_docs(&[("doc-1", "One", 2.0), ("doc-2", "Two", 1.0)])),
		FakeSemantic::returning(vector_hits(&[("doc-2", 0.9)])),
	)
}

#[tokio::test]
async fn repeated_query_is_served_from_the_remote_tier() {
	let (lexical, semantic) = backends();
	let h = harness(lexical, semantic);
	let req = QueryRequest::new("rust");
	let first = h.service.execute_hybrid_search(&req, None).await;
	let second = h.service.execute_hybrid_search(&req, None).await;

	assert_eq!(first, second);
	assert_eq!(h.lexical.calls(), 1);
	assert_eq!(h.semantic.calls(), 1);
	assert_eq!(h.remote.len(), 1);
	assert_eq!(h.metrics.count(metrics::REMOTE_CACHE_MISS), 1);
	assert_eq!(h.metrics.count(metrics::LOCAL_CACHE_MISS), 1);
	assert_eq!(h.metrics.count(metrics::REMOTE_CACHE_HIT), 1);

	let statuses: Vec<ExecutionStatus> =
		h.logged(2).await.into_iter().map(|entry| entry.status).collect();

	assert!(statuses.contains(&ExecutionStatus::CacheHitRemote));
}

#[tokio::test]
async fn local_tier_answers_when_remote_is_disabled() {
	let mut cfg = test_config();

	cfg.cache.remote.enabled = false;

	let (lexical, semantic) = backends();
	let h = harness_with(cfg, lexical, semantic, MemoryRemoteCache::default());
	let req = QueryRequest::new("rust");

	h.service.execute_hybrid_search(&req, None).await;
	h.service.execute_hybrid_search(&req, None).await;

	assert_eq!(h.lexical.calls(), 1);
	assert_eq!(h.remote.gets(), 0);
	assert_eq!(h.remote.puts(), 0);
	assert_eq!(h.service.cache().local.len(), 1);
	assert_eq!(h.metrics.count(metrics::LOCAL_CACHE_HIT), 1);

	let statuses: Vec<ExecutionStatus> =
		h.logged(2).await.into_iter().map(|entry| entry.status).collect();

	assert!(statuses.contains(&ExecutionStatus::CacheHitLocal));
}

#[tokio::test]
async fn failing_remote_tier_falls_back_to_local() {
	let (lexical, semantic) = backends();
	let h = harness_with(test_config(), lexical, semantic, MemoryRemoteCache::failing());
	let req = QueryRequest::new("rust");
	let first = h.service.execute_hybrid_search(&req, None).await;
	let second = h.service.execute_hybrid_search(&req, None).await;

	assert_eq!(first, second);
	assert_eq!(h.lexical.calls(), 1);
	assert_eq!(h.metrics.count(metrics::LOCAL_CACHE_HIT), 1);
	assert_eq!(h.metrics.count(metrics::LOCAL_CACHE_MISS), 1);
	// The local hit on the second query still counts as a remote miss.
	assert_eq!(h.metrics.count(metrics::REMOTE_CACHE_MISS), 2);
	assert_eq!(h.metrics.count(metrics::REMOTE_CACHE_HIT), 0);
}

#[tokio::test]
async fn disabled_tiers_always_recompute() {
	let mut cfg = test_config();

	cfg.cache.remote.enabled = false;
	cfg.cache.local.enabled = false;

	let (lexical, semantic) = backends();
	let h = harness_with(cfg, lexical, semantic, MemoryRemoteCache::default());
	let req = QueryRequest::new("rust");

	h.service.execute_hybrid_search(&req, None).await;
	h.service.execute_hybrid_search(&req, None).await;

	assert_eq!(h.lexical.calls(), 2);
	assert!(h.service.cache().local.is_empty());
	assert!(h.remote.is_empty());
}

#[tokio::test]
async fn equivalent_requests_share_a_cache_entry() {
	let (lexical, semantic) = backends();
	let h = harness(lexical, semantic);

	h.service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;
	h.service
		.execute_hybrid_search(
			&QueryRequest::new("rust").with_top_k(20).with_mode("HYBRID").with_filter("none"),
			None,
		)
		.await;
	h.service.execute_hybrid_search(&QueryRequest::new("rust").with_mode("semantic"), None).await;

	assert_eq!(h.lexical.calls(), 2);
}

#[tokio::test]
async fn cached_results_are_independent_copies() {
	let mut cfg = test_config();

	cfg.cache.remote.enabled = false;

	let (lexical, semantic) = backends();
	let collaborators = Collaborators::new(Arc::new(lexical), Arc::new(semantic));
	let service = FederationService::with_collaborators(cfg, collaborators);
	let req = QueryRequest::new("rust");
	let mut first = service.execute_hybrid_search(&req, None).await;
	let expected = first.clone();

	first.ranked_results.clear();
	first.message.clear();

	let second = service.execute_hybrid_search(&req, None).await;

	assert_eq!(second, expected);
}
