use fedsearch_domain::EMPTY_FACETS_RESPONSE;
use fedsearch_testkit::{FakeLexical, FakeSemantic, Reply};

use super::harness;

const FACET_TEMPLATE: &str = r#"{"facet_counts":{"facet_fields":{"{field}":["a",{limit}]}}}"#;

#[tokio::test]
async fn defaults_apply_to_missing_field_and_limit() {
	let h = harness(
		FakeLexical::returning("").with_facets(Reply::Body(FACET_TEMPLATE.to_string())),
		FakeSemantic::returning("[]"),
	);

	assert_eq!(
		h.service.fetch_facets(None, None).await,
		r#"{"facet_counts":{"facet_fields":{"category":["a",20]}}}"#
	);
	assert_eq!(
		h.service.fetch_facets(Some("  "), Some(0)).await,
		r#"{"facet_counts":{"facet_fields":{"category":["a",20]}}}"#
	);
}

#[tokio::test]
async fn explicit_field_and_limit_are_forwarded() {
	let h = harness(
		FakeLexical::returning("").with_facets(Reply::Body(FACET_TEMPLATE.to_string())),
		FakeSemantic::returning("[]"),
	);

	assert_eq!(
		h.service.fetch_facets(Some("author"), Some(5)).await,
		r#"{"facet_counts":{"facet_fields":{"author":["a",5]}}}"#
	);
	assert_eq!(h.lexical.facet_calls(), 1);
}

#[tokio::test]
async fn backend_failure_returns_empty_facets() {
	let h = harness(
		FakeLexical::returning("").with_facets(Reply::Fail("solr down".to_string())),
		FakeSemantic::returning("[]"),
	);

	assert_eq!(h.service.fetch_facets(Some("category"), Some(10)).await, EMPTY_FACETS_RESPONSE);
}
