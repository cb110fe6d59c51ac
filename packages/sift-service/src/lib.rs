pub mod search;
pub mod shared;

mod error;

pub use error::{Error, Result};
pub use search::{
	PipelineConfig, RerankOnly, SearchOutcome, SearchService, SelectionPolicy, StageScores,
};
pub use sift_domain::{Document, ScoredCandidate};

use std::{future::Future, pin::Pin, sync::Arc};

use sift_providers::{HttpEmbedder, HttpReranker};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Batch text embedding (bi-encoder). Vectors are returned in input order.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Batch pair scoring (cross-encoder). One score per document, higher is more relevant.
pub trait RerankProvider
where
	Self: Send + Sync,
{
	fn rerank<'a>(&'a self, query: &'a str, docs: &'a [String]) -> BoxFuture<'a, Result<Vec<f32>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, rerank: Arc<dyn RerankProvider>) -> Self {
		Self { embedding, rerank }
	}

	/// HTTP-backed providers built from configuration.
	pub fn from_config(cfg: &sift_config::Providers) -> Result<Self> {
		let embedding = HttpEmbedder::new(cfg.embedding.clone())?;
		let rerank = HttpReranker::new(cfg.rerank.clone())?;

		Ok(Self { embedding: Arc::new(embedding), rerank: Arc::new(rerank) })
	}
}

impl EmbeddingProvider for HttpEmbedder {
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(HttpEmbedder::embed(self, texts).await?) })
	}
}

impl RerankProvider for HttpReranker {
	fn rerank<'a>(&'a self, query: &'a str, docs: &'a [String]) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move { Ok(HttpReranker::rerank(self, query, docs).await?) })
	}
}
