use std::{cmp::Ordering, collections::HashMap};

use crate::{
	query::{QueryMode, ResultFilter},
	result::RankedResult,
	signal::DocSignal,
};

pub const LEXICAL_WEIGHT: f64 = 0.6;
pub const SEMANTIC_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
struct MergedSignal {
	id: String,
	title: String,
	lexical_score: f64,
	semantic_score: f64,
}

/// Merges both signal lists by document id and returns at most `top_k` ranked results.
///
/// Each source is max-normalized into `[0, 1]`. A filter drops the other source before merging and
/// pins the fused score to the remaining one. Ordering follows the mode's own score unless that
/// score is zero for every document, in which case the fused score decides.
pub fn fuse_and_rank(
	lexical: &[DocSignal],
	semantic: &[DocSignal],
	top_k: usize,
	mode: QueryMode,
	filter: ResultFilter,
) -> Vec<RankedResult> {
	let lexical: &[DocSignal] = if filter == ResultFilter::VectorOnly { &[] } else { lexical };
	let semantic: &[DocSignal] = if filter == ResultFilter::LexicalOnly { &[] } else { semantic };
	let max_lexical = max_score(lexical);
	let max_semantic = max_score(semantic);
	let mut merged: Vec<MergedSignal> = Vec::with_capacity(lexical.len() + semantic.len());
	let mut by_id: HashMap<String, usize> = HashMap::new();

	for signal in lexical {
		let entry = merged_entry(&mut merged, &mut by_id, signal);

		entry.lexical_score = normalize(signal.raw_score, max_lexical);
	}
	for signal in semantic {
		let entry = merged_entry(&mut merged, &mut by_id, signal);

		entry.semantic_score = normalize(signal.raw_score, max_semantic);
	}

	let mut ranked: Vec<RankedResult> = merged
		.into_iter()
		.map(|signal| {
			let fused_score = match filter {
				ResultFilter::LexicalOnly => signal.lexical_score,
				ResultFilter::VectorOnly => signal.semantic_score,
				ResultFilter::None =>
					LEXICAL_WEIGHT * signal.lexical_score + SEMANTIC_WEIGHT * signal.semantic_score,
			};

			RankedResult {
				id: signal.id,
				title: signal.title,
				fused_score,
				lexical_score: signal.lexical_score,
				semantic_score: signal.semantic_score,
			}
		})
		.collect();
	let sort_key = effective_sort_key(mode, &ranked);

	// Stable sort: ties keep first-seen order, lexical before semantic.
	ranked.sort_by(|a, b| cmp_f64_desc(sort_key(a), sort_key(b)));
	ranked.truncate(top_k);

	ranked
}

pub fn normalize(value: f64, max: f64) -> f64 {
	if max <= 0.0 {
		return 0.0;
	}

	(value / max).clamp(0.0, 1.0)
}

fn max_score(signals: &[DocSignal]) -> f64 {
	signals.iter().map(|signal| signal.raw_score).reduce(f64::max).unwrap_or(1.0)
}

fn merged_entry<'a>(
	merged: &'a mut Vec<MergedSignal>,
	by_id: &mut HashMap<String, usize>,
	signal: &DocSignal,
) -> &'a mut MergedSignal {
	let index = *by_id.entry(signal.id.clone()).or_insert_with(|| {
		merged.push(MergedSignal {
			id: signal.id.clone(),
			title: String::new(),
			lexical_score: 0.0,
			semantic_score: 0.0,
		});

		merged.len() - 1
	});
	let entry = &mut merged[index];

	if entry.title.trim().is_empty() {
		entry.title = signal.title.clone();
	}

	entry
}

fn effective_sort_key(mode: QueryMode, ranked: &[RankedResult]) -> fn(&RankedResult) -> f64 {
	let fused: fn(&RankedResult) -> f64 = |result| result.fused_score;

	match mode {
		QueryMode::Hybrid => fused,
		QueryMode::Lexical =>
			if ranked.iter().any(|result| result.lexical_score > 0.0) {
				|result| result.lexical_score
			} else {
				fused
			},
		QueryMode::Semantic =>
			if ranked.iter().any(|result| result.semantic_score > 0.0) {
				|result| result.semantic_score
			} else {
				fused
			},
	}
}

fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
