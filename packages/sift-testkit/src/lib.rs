//! Deterministic stand-ins for the neural scoring providers, plus shared fixtures.

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use sift_domain::{Document, tokenizer};
use sift_service::{BoxFuture, EmbeddingProvider, Error, Providers, RerankProvider, Result};

pub const STUB_DIMENSIONS: usize = 64;

/// Hashed bag-of-words embedder. Texts sharing terms point in similar directions.
#[derive(Debug, Default)]
pub struct HashEmbedding {
	calls: AtomicUsize,
	texts: AtomicUsize,
}
impl HashEmbedding {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of `embed` calls so far.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Number of texts embedded so far.
	pub fn texts(&self) -> usize {
		self.texts.load(Ordering::SeqCst)
	}

	pub fn vector(text: &str) -> Vec<f32> {
		let mut out = vec![0.0_f32; STUB_DIMENSIONS];

		for term in tokenizer::tokenize(text) {
			out[bucket(&term)] += 1.0;
		}

		out
	}
}
impl EmbeddingProvider for HashEmbedding {
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.texts.fetch_add(texts.len(), Ordering::SeqCst);

		let vectors = texts.iter().map(|text| Self::vector(text)).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Scores a pair by shared query terms, with shorter documents winning ties.
#[derive(Debug, Default)]
pub struct OverlapRerank {
	calls: AtomicUsize,
	last_batch: AtomicUsize,
}
impl OverlapRerank {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Size of the most recent batch.
	pub fn last_batch(&self) -> usize {
		self.last_batch.load(Ordering::SeqCst)
	}

	pub fn score(query: &str, doc: &str) -> f32 {
		let query_terms = tokenizer::tokenize(query);
		let doc_terms = tokenizer::tokenize(doc);
		let overlap = query_terms.iter().filter(|term| doc_terms.contains(term)).count();

		overlap as f32 + 1.0 / (1.0 + doc.len() as f32)
	}
}
impl RerankProvider for OverlapRerank {
	fn rerank<'a>(&'a self, query: &'a str, docs: &'a [String]) -> BoxFuture<'a, Result<Vec<f32>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.last_batch.store(docs.len(), Ordering::SeqCst);

		let scores = docs.iter().map(|doc| Self::score(query, doc)).collect();

		Box::pin(async move { Ok(scores) })
	}
}

/// Gives every pair the same score.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRerank(pub f32);
impl RerankProvider for ConstantRerank {
	fn rerank<'a>(&'a self, _query: &'a str, docs: &'a [String]) -> BoxFuture<'a, Result<Vec<f32>>> {
		let scores = vec![self.0; docs.len()];

		Box::pin(async move { Ok(scores) })
	}
}

/// Returns one score fewer than requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortRerank;
impl RerankProvider for ShortRerank {
	fn rerank<'a>(&'a self, _query: &'a str, docs: &'a [String]) -> BoxFuture<'a, Result<Vec<f32>>> {
		let scores = vec![0.5; docs.len().saturating_sub(1)];

		Box::pin(async move { Ok(scores) })
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEmbedding;
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(&'a self, _texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Err(Error::provider("embedding backend unavailable")) })
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRerank;
impl RerankProvider for FailingRerank {
	fn rerank<'a>(&'a self, _query: &'a str, _docs: &'a [String]) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move { Err(Error::provider("rerank backend unavailable")) })
	}
}

/// Hash embedder plus overlap reranker.
pub fn stub_providers() -> Providers {
	Providers::new(Arc::new(HashEmbedding::new()), Arc::new(OverlapRerank::new()))
}

pub fn documents(texts: &[(&str, &str)]) -> Vec<Document> {
	texts.iter().map(|(id, text)| Document::new(*id, *text)).collect()
}

pub fn meeting_corpus() -> Vec<Document> {
	documents(&[
		("1", "project update meeting notes"),
		("2", "lunch menu for Friday"),
		("3", "quarterly budget review meeting"),
	])
}

fn bucket(term: &str) -> usize {
	let hash = blake3::hash(term.as_bytes());
	let mut prefix = [0_u8; 8];

	prefix.copy_from_slice(&hash.as_bytes()[..8]);

	(u64::from_le_bytes(prefix) % STUB_DIMENSIONS as u64) as usize
}
