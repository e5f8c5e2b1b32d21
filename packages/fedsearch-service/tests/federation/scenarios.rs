use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use fedsearch_domain::{
	EMPTY_LEXICAL_RESPONSE, EMPTY_VECTOR_RESPONSE, ExecutionStatus, QueryRequest,
};
use fedsearch_service::{Collaborators, FederationService, metrics};
use fedsearch_testkit::{
	FakeLexical, FakeSemantic, MemoryRemoteCache, SpyQueryLog, lexical_docs, vector_hits,
};

use super::{harness, harness_with, test_config};

#[tokio::test]
async fn merges_both_sources_by_document_id() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-001", "First", 2.0), ("doc-002", "Second", 1.0)])),
		FakeSemantic::returning(vector_hits(&[("doc-002", 0.95), ("doc-003", 0.80)])),
	);
	let result = h.service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;
	let ids: Vec<&str> = result.ranked_results.iter().map(|r| r.id.as_str()).collect();

	assert_eq!(ids.len(), 3);
	assert_eq!(ids[0], "doc-002");
	assert_eq!(result.ranked_results[0].title, "Second");

	for ranked in &result.ranked_results {
		assert!((0.0..=1.0).contains(&ranked.lexical_score));
		assert!((0.0..=1.0).contains(&ranked.semantic_score));
		assert!((0.0..=1.0).contains(&ranked.fused_score));
	}

	let logged = h.logged(1).await;

	assert_eq!(logged[0].status, ExecutionStatus::Success);
	assert_eq!(logged[0].top_k, 20);
	assert_eq!(h.metrics.count(metrics::HYBRID_QUERY_COUNT), 1);
	assert_eq!(h.metrics.timings(metrics::RANKING_MERGE_DURATION).len(), 1);
}

#[tokio::test]
async fn both_backends_failing_yields_empty_placeholders() {
	let h = harness(FakeLexical::failing("solr down"), FakeSemantic::failing("vector down"));
	let result = h.service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;

	assert!(result.ranked_results.is_empty());
	assert_eq!(result.lexical_payload, EMPTY_LEXICAL_RESPONSE);
	assert_eq!(result.vector_payload, EMPTY_VECTOR_RESPONSE);
	assert_eq!(h.metrics.count(metrics::STAGE_ERROR), 2);
	assert_eq!(h.logged(1).await[0].status, ExecutionStatus::PartialDownstreamError);
}

#[tokio::test]
async fn top_k_caps_the_ranked_list() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("a", "", 3.0), ("b", "", 2.0), ("c", "", 1.0)])),
		FakeSemantic::returning(vector_hits(&[("d", 0.9)])),
	);
	let result =
		h.service.execute_hybrid_search(&QueryRequest::new("rust").with_top_k(2), None).await;

	assert_eq!(result.ranked_results.len(), 2);
	assert_eq!(h.semantic.last_top_k(), 2);
}

#[tokio::test]
async fn slow_vector_stage_is_cut_off_by_its_budget() {
	let mut cfg = test_config();

	cfg.execution.total_budget_ms = 120;
	cfg.execution.vector_stage_budget_ms = 60;

	let h = harness_with(
		cfg,
		FakeLexical::returning(lexical_docs(&[("doc-lex", "Lexical", 1.0)])),
		FakeSemantic::returning(vector_hits(&[("doc-vec", 0.9)]))
			.with_delay(Duration::from_millis(250)),
		MemoryRemoteCache::default(),
	);
	let started = Instant::now();
	let result = h.service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;

	assert!(started.elapsed() < Duration::from_millis(250));
	assert_eq!(result.vector_payload, EMPTY_VECTOR_RESPONSE);
	assert_eq!(result.ranked_results.len(), 1);
	assert_eq!(result.ranked_results[0].id, "doc-lex");
	assert_eq!(h.metrics.count(metrics::STAGE_TIMEOUT), 1);
	assert_eq!(h.logged(1).await[0].status, ExecutionStatus::PartialVectorTimeout);
}

#[tokio::test]
async fn exhausted_budget_skips_the_vector_stage() {
	let mut cfg = test_config();

	cfg.execution.total_budget_ms = 100;
	cfg.execution.vector_stage_budget_ms = 25;

	let h = harness_with(
		cfg,
		FakeLexical::returning(lexical_docs(&[("doc-lex", "Lexical", 1.0)])),
		FakeSemantic::returning(vector_hits(&[("doc-vec", 0.9)])),
		MemoryRemoteCache::default().with_read_delay(Duration::from_millis(45)),
	);
	let result = h.service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;
	let ids: Vec<&str> = result.ranked_results.iter().map(|r| r.id.as_str()).collect();

	assert_eq!(h.semantic.calls(), 0);
	assert_eq!(h.metrics.count(metrics::VECTOR_STAGE_SKIPPED_BUDGET), 1);
	assert_eq!(h.metrics.count(metrics::STAGE_TIMEOUT), 0);
	assert_eq!(ids, vec!["doc-lex"]);
	assert_eq!(result.vector_payload, EMPTY_VECTOR_RESPONSE);
	assert_eq!(h.logged(1).await[0].status, ExecutionStatus::PartialVectorTimeout);
}

#[tokio::test]
async fn slow_lexical_stage_is_reported_first() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-lex", "", 1.0)]))
			.with_delay(Duration::from_millis(600)),
		FakeSemantic::returning(vector_hits(&[("doc-vec", 0.9)])),
	);
	let result = h.service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;
	let ids: Vec<&str> = result.ranked_results.iter().map(|r| r.id.as_str()).collect();

	assert_eq!(result.lexical_payload, EMPTY_LEXICAL_RESPONSE);
	assert_eq!(ids, vec!["doc-vec"]);
	assert_eq!(h.logged(1).await[0].status, ExecutionStatus::PartialLexicalTimeout);
}

#[tokio::test]
async fn lexical_mode_orders_by_lexical_score() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-lex", "", 0.5), ("doc-shared", "", 0.4)])),
		FakeSemantic::returning(vector_hits(&[("doc-shared", 0.95)])),
	);
	let result = h
		.service
		.execute_hybrid_search(&QueryRequest::new("rust").with_mode("lexical"), None)
		.await;

	assert_eq!(result.ranked_results[0].id, "doc-lex");
	assert!(result.message.contains("mode=lexical"));
}

#[tokio::test]
async fn solr_filter_drops_semantic_signals() {
	let lexical_payload = lexical_docs(&[("doc-lex", "Lexical", 2.0)]);
	let h = harness(
		FakeLexical::returning(lexical_payload.clone()),
		FakeSemantic::returning(vector_hits(&[("doc-lex", 0.9), ("doc-vec", 0.95)])),
	);
	let result = h
		.service
		.execute_hybrid_search(&QueryRequest::new("rust").with_filter("solr"), None)
		.await;

	assert_eq!(result.ranked_results.len(), 1);
	assert_eq!(result.ranked_results[0].semantic_score, 0.0);
	assert_eq!(result.vector_payload, EMPTY_VECTOR_RESPONSE);
	assert_eq!(result.lexical_payload, lexical_payload);
	assert!(result.message.contains("filter=solr"));
}

#[tokio::test]
async fn vector_filter_drops_lexical_payload() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-lex", "Lexical", 2.0)])),
		FakeSemantic::returning(vector_hits(&[("doc-vec", 0.95)])),
	);
	let result = h
		.service
		.execute_hybrid_search(&QueryRequest::new("rust").with_filter("vector"), None)
		.await;

	assert_eq!(result.lexical_payload, EMPTY_LEXICAL_RESPONSE);
	assert_eq!(result.ranked_results.len(), 1);
	assert_eq!(result.ranked_results[0].id, "doc-vec");
	assert_eq!(result.ranked_results[0].fused_score, 1.0);
}

#[tokio::test]
async fn blank_query_is_logged_as_empty() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[])),
		FakeSemantic::returning(vector_hits(&[])),
	);
	let result = h.service.execute_hybrid_search(&QueryRequest::default(), Some("trace-1")).await;

	assert!(result.ranked_results.is_empty());
	assert_eq!(h.logged(1).await[0].status, ExecutionStatus::EmptyQuery);
}

#[tokio::test]
async fn failing_query_log_does_not_affect_results() {
	let collaborators = Collaborators::new(
		Arc::new(FakeLexical::returning(lexical_docs(&[("doc-1", "", 1.0)]))),
		Arc::new(FakeSemantic::returning(vector_hits(&[]))),
	)
	.with_query_log(Arc::new(SpyQueryLog::failing()));
	let service = FederationService::with_collaborators(test_config(), collaborators);
	let result = service.execute_hybrid_search(&QueryRequest::new("rust"), None).await;

	assert_eq!(result.ranked_results.len(), 1);
}
