use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderMap, StatusCode, header},
	response::IntoResponse,
	routing::{get, post},
};
use fedsearch_domain::{QueryRequest, QueryResult};
use serde::Deserialize;

use crate::state::AppState;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Debug, Default, Deserialize)]
pub struct FacetParams {
	pub field: Option<String>,
	pub limit: Option<i64>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/search", post(search))
		.route("/facets", get(facets))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<QueryRequest>,
) -> Json<QueryResult> {
	let trace_id = headers.get(TRACE_ID_HEADER).and_then(|value| value.to_str().ok());
	let result = state.service.execute_hybrid_search(&payload, trace_id).await;

	Json(result)
}

async fn facets(
	State(state): State<AppState>,
	Query(params): Query<FacetParams>,
) -> impl IntoResponse {
	let body = state.service.fetch_facets(params.field.as_deref(), params.limit).await;

	([(header::CONTENT_TYPE, "application/json")], body)
}
