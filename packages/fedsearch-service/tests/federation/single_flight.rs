use std::time::Duration;

use fedsearch_domain::QueryRequest;
use fedsearch_testkit::{FakeLexical, FakeSemantic, lexical_docs, vector_hits};

use super::harness;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_queries_hit_backends_once() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-1", "One", 1.0)]))
			.with_delay(Duration::from_millis(50)),
		FakeSemantic::returning(vector_hits(&[("doc-1", 0.9)])),
	);
	let mut handles = Vec::new();

	for _ in 0..8 {
		let service = h.service.clone();

		handles.push(tokio::spawn(async move {
			service.execute_hybrid_search(&QueryRequest::new("same query"), None).await
		}));
	}

	let mut results = Vec::new();

	for handle in handles {
		results.push(handle.await.expect("Failed to join search task."));
	}

	assert_eq!(h.lexical.calls(), 1);
	assert_eq!(h.semantic.calls(), 1);
	assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
	assert_eq!(h.service.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_queries_run_independently() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-1", "One", 1.0)]))
			.with_delay(Duration::from_millis(50)),
		FakeSemantic::returning(vector_hits(&[])),
	);
	let first = {
		let service = h.service.clone();

		tokio::spawn(async move {
			service.execute_hybrid_search(&QueryRequest::new("alpha"), None).await
		})
	};
	let second = {
		let service = h.service.clone();

		tokio::spawn(async move {
			service.execute_hybrid_search(&QueryRequest::new("beta"), None).await
		})
	};

	first.await.expect("Failed to join first search.");
	second.await.expect("Failed to join second search.");

	assert_eq!(h.lexical.calls(), 2);
	assert_eq!(h.service.in_flight(), 0);
}

#[tokio::test]
async fn cancelled_search_releases_its_slot() {
	let h = harness(
		FakeLexical::returning(lexical_docs(&[("doc-1", "One", 1.0)]))
			.with_delay(Duration::from_millis(200)),
		FakeSemantic::returning(vector_hits(&[])),
	);
	let req = QueryRequest::new("abandoned");
	let cancelled = tokio::time::timeout(
		Duration::from_millis(30),
		h.service.execute_hybrid_search(&req, None),
	)
	.await;

	assert!(cancelled.is_err());
	assert_eq!(h.service.in_flight(), 0);

	let result = h.service.execute_hybrid_search(&req, None).await;

	assert_eq!(result.ranked_results.len(), 1);
}
