use crate::ranking::{self, ScoredCandidate};

/// Cosine similarity in `[-1, 1]`. Zero-norm or mismatched vectors score 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	(dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// The `k` documents nearest to `query`, `k` clamped to the number of documents. No
/// similarity threshold is applied.
pub fn nearest(query: &[f32], documents: &[Vec<f32>], k: usize) -> Vec<ScoredCandidate> {
	let scores: Vec<f32> = documents.iter().map(|doc| cosine(query, doc)).collect();

	ranking::top_scores(&scores, k.min(documents.len()))
}
