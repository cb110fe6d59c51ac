mod arena;
mod selection;

pub use arena::CorpusArena;
pub use selection::{RerankOnly, SelectionPolicy};

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;

use crate::{Error, Providers, Result};
use sift_domain::{Document, ScoredCandidate, ranking, similarity, tokenizer};

/// Candidate-set sizes for one search. `0 < final_result_count <= semantic_candidate_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
	semantic_candidate_count: usize,
	final_result_count: usize,
}
impl PipelineConfig {
	pub fn new(semantic_candidate_count: usize, final_result_count: usize) -> Result<Self> {
		if semantic_candidate_count == 0 {
			return Err(Error::InvalidRequest {
				message: "semantic_candidate_count must be greater than zero.".to_string(),
			});
		}
		if final_result_count == 0 {
			return Err(Error::InvalidRequest {
				message: "final_result_count must be greater than zero.".to_string(),
			});
		}
		if final_result_count > semantic_candidate_count {
			return Err(Error::InvalidRequest {
				message: "final_result_count must be less than or equal to semantic_candidate_count."
					.to_string(),
			});
		}

		Ok(Self { semantic_candidate_count, final_result_count })
	}

	pub fn semantic_candidate_count(&self) -> usize {
		self.semantic_candidate_count
	}

	pub fn final_result_count(&self) -> usize {
		self.final_result_count
	}

	/// Keeps unspecified values from `self`. When only K is given, N is capped at K.
	pub fn with_overrides(
		&self,
		semantic_candidate_count: Option<usize>,
		final_result_count: Option<usize>,
	) -> Result<Self> {
		let semantic_candidate_count =
			semantic_candidate_count.unwrap_or(self.semantic_candidate_count);
		let final_result_count = final_result_count
			.unwrap_or_else(|| self.final_result_count.min(semantic_candidate_count));

		Self::new(semantic_candidate_count, final_result_count)
	}
}
impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			semantic_candidate_count: sift_config::DEFAULT_SEMANTIC_CANDIDATE_COUNT as usize,
			final_result_count: sift_config::DEFAULT_FINAL_RESULT_COUNT as usize,
		}
	}
}
impl TryFrom<&sift_config::Search> for PipelineConfig {
	type Error = Error;

	fn try_from(search: &sift_config::Search) -> Result<Self> {
		sift_config::validate_search(search)?;

		Self::new(search.semantic_candidate_count as usize, search.final_result_count as usize)
	}
}

/// Every stage's candidates, indexed into the searched corpus.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StageScores {
	/// BM25 top hits. Diagnostic under the default policy.
	pub lexical: Vec<ScoredCandidate>,
	/// Semantic candidates in cosine order, at most K.
	pub semantic: Vec<ScoredCandidate>,
	/// The same candidates in reranker order.
	pub reranked: Vec<ScoredCandidate>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchOutcome {
	pub documents: Vec<Document>,
	pub selected: Vec<ScoredCandidate>,
	pub stages: StageScores,
}

#[derive(Clone)]
pub struct SearchService {
	providers: Providers,
	policy: Arc<dyn SelectionPolicy>,
}
impl SearchService {
	pub fn new(providers: Providers) -> Self {
		Self::with_policy(providers, Arc::new(RerankOnly))
	}

	pub fn with_policy(providers: Providers, policy: Arc<dyn SelectionPolicy>) -> Self {
		Self { providers, policy }
	}

	pub fn providers(&self) -> &Providers {
		&self.providers
	}

	pub async fn search(
		&self,
		corpus: &[Document],
		query: &str,
		config: PipelineConfig,
	) -> Result<Vec<Document>> {
		Ok(self.search_with_trace(corpus, query, config).await?.documents)
	}

	/// Lexical scoring, semantic retrieval of K candidates, pairwise reranking, then selection
	/// of at most N documents. Any provider failure fails the whole search.
	pub async fn search_with_trace(
		&self,
		corpus: &[Document],
		query: &str,
		config: PipelineConfig,
	) -> Result<SearchOutcome> {
		let span = tracing::info_span!(
			"search",
			corpus_size = corpus.len(),
			k = config.semantic_candidate_count,
			n = config.final_result_count,
			policy = self.policy.name(),
		);

		self.run(corpus, query, config).instrument(span).await
	}

	async fn run(
		&self,
		corpus: &[Document],
		query: &str,
		config: PipelineConfig,
	) -> Result<SearchOutcome> {
		if corpus.is_empty() {
			tracing::debug!("Empty corpus; nothing to rank.");

			return Ok(SearchOutcome::default());
		}

		let limit = config.final_result_count.min(corpus.len());
		let k = config.semantic_candidate_count.min(corpus.len());
		let mut arena = CorpusArena::lexical(corpus);
		let query_terms = tokenizer::tokenize(query);
		let lexical = arena.bm25.top_n(&query_terms, limit);

		arena.embed_corpus(self.providers.embedding.as_ref()).await?;

		let query_vector = arena::embed_query(self.providers.embedding.as_ref(), query).await?;

		arena::check_dimensions(&query_vector, &arena.vectors)?;

		let semantic = similarity::nearest(&query_vector, &arena.vectors, k);
		let reranked = self.rerank(&arena, query, &semantic).await?;
		let stages = StageScores { lexical, semantic, reranked };
		let selected: Vec<ScoredCandidate> = self
			.policy
			.select(&stages, limit)
			.into_iter()
			.filter(|hit| hit.document_index < corpus.len())
			.take(limit)
			.collect();

		log_stage("lexical", &stages.lexical, &arena, limit);
		log_stage("semantic", &stages.semantic, &arena, limit);
		log_stage("reranked", &stages.reranked, &arena, limit);

		let documents =
			selected.iter().map(|hit| arena.document(hit.document_index).clone()).collect();

		Ok(SearchOutcome { documents, selected, stages })
	}

	async fn rerank(
		&self,
		arena: &CorpusArena<'_>,
		query: &str,
		candidates: &[ScoredCandidate],
	) -> Result<Vec<ScoredCandidate>> {
		let docs: Vec<String> =
			candidates.iter().map(|hit| arena.text(hit.document_index).to_string()).collect();
		let scores = self.providers.rerank.rerank(query, &docs).await?;

		if scores.len() != candidates.len() {
			return Err(Error::provider(format!(
				"Rerank provider returned {} scores for {} candidates.",
				scores.len(),
				candidates.len()
			)));
		}

		let rescored = candidates
			.iter()
			.zip(scores)
			.map(|(hit, score)| ScoredCandidate::new(hit.document_index, score))
			.collect();

		Ok(ranking::select_top(rescored, candidates.len()))
	}
}

fn log_stage(stage: &'static str, hits: &[ScoredCandidate], arena: &CorpusArena<'_>, limit: usize) {
	for (rank, hit) in hits.iter().take(limit).enumerate() {
		tracing::debug!(
			stage,
			rank = rank + 1,
			document_id = %arena.document(hit.document_index).id,
			score = hit.score,
			"Stage top hit."
		);
	}
}
