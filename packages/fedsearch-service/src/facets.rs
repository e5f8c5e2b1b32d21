use fedsearch_domain::EMPTY_FACETS_RESPONSE;

use crate::FederationService;

pub const DEFAULT_FACET_FIELD: &str = "category";
pub const DEFAULT_FACET_LIMIT: u32 = 20;

impl FederationService {
	/// Raw facet counts for `field`, or an empty facet document when the backend fails.
	pub async fn fetch_facets(&self, field: Option<&str>, limit: Option<i64>) -> String {
		let field =
			field.map(str::trim).filter(|field| !field.is_empty()).unwrap_or(DEFAULT_FACET_FIELD);
		let limit = match limit {
			Some(limit) if limit > 0 => u32::try_from(limit).unwrap_or(u32::MAX),
			_ => DEFAULT_FACET_LIMIT,
		};

		match self.collaborators.lexical.facets(field, limit).await {
			Ok(body) if !body.trim().is_empty() => body,
			Ok(_) => EMPTY_FACETS_RESPONSE.to_string(),
			Err(err) => {
				tracing::warn!(error = %err, facet_field = field, "Facet lookup failed.");

				EMPTY_FACETS_RESPONSE.to_string()
			},
		}
	}
}
