use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A document position in the corpus paired with a stage-specific score.
///
/// Scores from different stages (lexical, cosine, pairwise) are never compared with each other.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
	pub document_index: usize,
	pub score: f32,
}
impl ScoredCandidate {
	pub fn new(document_index: usize, score: f32) -> Self {
		Self { document_index, score }
	}
}

/// Descending score order; NaN sorts last.
pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

pub fn cmp_candidates(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
	cmp_f32_desc(left.score, right.score)
		.then_with(|| left.document_index.cmp(&right.document_index))
}

/// Orders candidates by descending score, lower document index first on ties, and keeps at
/// most `limit` of them.
pub fn select_top(mut candidates: Vec<ScoredCandidate>, limit: usize) -> Vec<ScoredCandidate> {
	candidates.sort_by(cmp_candidates);
	candidates.truncate(limit);

	candidates
}

/// Scores indexed by document position, turned into the best `limit` candidates.
pub fn top_scores(scores: &[f32], limit: usize) -> Vec<ScoredCandidate> {
	let candidates = scores
		.iter()
		.enumerate()
		.map(|(document_index, score)| ScoredCandidate::new(document_index, *score))
		.collect();

	select_top(candidates, limit)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ties_keep_lower_index_first() {
		let top = top_scores(&[0.5, 0.9, 0.5, 0.9], 3);
		let order: Vec<usize> = top.iter().map(|c| c.document_index).collect();

		assert_eq!(order, vec![1, 3, 0]);
	}

	#[test]
	fn nan_sorts_after_numbers() {
		let top = top_scores(&[f32::NAN, -1.0, 2.0], 3);
		let order: Vec<usize> = top.iter().map(|c| c.document_index).collect();

		assert_eq!(order, vec![2, 1, 0]);
	}

	#[test]
	fn limit_larger_than_input_keeps_everything() {
		assert_eq!(top_scores(&[1.0, 2.0], 10).len(), 2);
		assert!(top_scores(&[], 5).is_empty());
	}
}
