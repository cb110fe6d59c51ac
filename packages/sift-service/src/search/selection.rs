use sift_domain::ScoredCandidate;

use super::StageScores;

/// Final-selection strategy applied after every stage has produced its candidates.
pub trait SelectionPolicy
where
	Self: Send + Sync,
{
	fn name(&self) -> &'static str;

	/// Returns at most `limit` candidates in final order.
	fn select(&self, stages: &StageScores, limit: usize) -> Vec<ScoredCandidate>;
}

/// Ranks purely by pairwise reranker score. Lexical scores stay diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct RerankOnly;
impl SelectionPolicy for RerankOnly {
	fn name(&self) -> &'static str {
		"rerank_only"
	}

	fn select(&self, stages: &StageScores, limit: usize) -> Vec<ScoredCandidate> {
		stages.reranked.iter().take(limit).copied().collect()
	}
}
