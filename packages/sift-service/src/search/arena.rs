use sift_domain::{Document, lexical::Bm25, tokenizer};

use crate::{EmbeddingProvider, Error, Result};

/// Data derived from one corpus snapshot for one search call. Dropped when the call returns.
pub struct CorpusArena<'c> {
	pub corpus: &'c [Document],
	pub texts: Vec<String>,
	pub bm25: Bm25,
	pub vectors: Vec<Vec<f32>>,
}
impl<'c> CorpusArena<'c> {
	pub fn lexical(corpus: &'c [Document]) -> Self {
		let texts: Vec<String> = corpus.iter().map(|doc| doc.text.clone()).collect();
		let tokens: Vec<Vec<String>> =
			texts.iter().map(|text| tokenizer::tokenize(text)).collect();
		let bm25 = Bm25::new(&tokens);

		Self { corpus, texts, bm25, vectors: Vec::new() }
	}

	/// Embeds every document in one batch call.
	pub async fn embed_corpus(&mut self, embedding: &dyn EmbeddingProvider) -> Result<()> {
		if self.texts.is_empty() {
			return Ok(());
		}

		let vectors = embedding.embed(&self.texts).await?;

		if vectors.len() != self.texts.len() {
			return Err(Error::provider(format!(
				"Embedding provider returned {} vectors for {} documents.",
				vectors.len(),
				self.texts.len()
			)));
		}

		self.vectors = vectors;

		Ok(())
	}

	pub fn text(&self, document_index: usize) -> &str {
		self.texts[document_index].as_str()
	}

	pub fn document(&self, document_index: usize) -> &'c Document {
		&self.corpus[document_index]
	}
}

pub async fn embed_query(embedding: &dyn EmbeddingProvider, query: &str) -> Result<Vec<f32>> {
	let mut vectors = embedding.embed(&[query.to_string()]).await?;

	if vectors.len() != 1 {
		return Err(Error::provider(format!(
			"Embedding provider returned {} vectors for one query.",
			vectors.len()
		)));
	}

	Ok(vectors.remove(0))
}

pub fn check_dimensions(query: &[f32], vectors: &[Vec<f32>]) -> Result<()> {
	if query.is_empty() {
		return Err(Error::provider("Embedding provider returned an empty query vector."));
	}
	if let Some(position) = vectors.iter().position(|vector| vector.len() != query.len()) {
		return Err(Error::provider(format!(
			"Document {position} embedding has {} dimensions, query has {}.",
			vectors[position].len(),
			query.len()
		)));
	}

	Ok(())
}
