//! Okapi BM25 over a corpus snapshot.
//!
//! Statistics are built once per corpus and never updated incrementally.

use std::collections::HashMap;

use crate::{ranking::ScoredCandidate, tokenizer};

pub const BM25_K1: f32 = 1.5;
pub const BM25_B: f32 = 0.75;
/// Floor for negative IDF values, as a fraction of the mean IDF.
pub const BM25_EPSILON: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct Bm25 {
	term_freqs: Vec<HashMap<String, u32>>,
	doc_lens: Vec<usize>,
	avgdl: f32,
	idf: HashMap<String, f32>,
}
impl Bm25 {
	pub fn new(corpus: &[Vec<String>]) -> Self {
		let mut term_freqs = Vec::with_capacity(corpus.len());
		let mut doc_lens = Vec::with_capacity(corpus.len());
		let mut doc_freq: HashMap<String, u32> = HashMap::new();
		let mut total_len = 0_usize;

		for terms in corpus {
			let mut freqs: HashMap<String, u32> = HashMap::new();

			for term in terms {
				*freqs.entry(term.clone()).or_insert(0) += 1;
			}
			for term in freqs.keys() {
				*doc_freq.entry(term.clone()).or_insert(0) += 1;
			}

			total_len += terms.len();

			doc_lens.push(terms.len());
			term_freqs.push(freqs);
		}

		let avgdl = if corpus.is_empty() { 0.0 } else { total_len as f32 / corpus.len() as f32 };
		let idf = compute_idf(&doc_freq, corpus.len());

		Self { term_freqs, doc_lens, avgdl, idf }
	}

	pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
		let corpus: Vec<Vec<String>> = texts.into_iter().map(tokenizer::tokenize).collect();

		Self::new(&corpus)
	}

	pub fn len(&self) -> usize {
		self.doc_lens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.doc_lens.is_empty()
	}

	pub fn average_doc_len(&self) -> f32 {
		self.avgdl
	}

	pub fn idf(&self, term: &str) -> Option<f32> {
		self.idf.get(term).copied()
	}

	/// One score per document, in corpus order. Documents with no query terms score 0.
	pub fn scores(&self, query_terms: &[String]) -> Vec<f32> {
		let mut scores = vec![0.0_f32; self.len()];

		if query_terms.is_empty() || self.avgdl <= 0.0 {
			return scores;
		}

		for term in query_terms {
			let Some(idf) = self.idf.get(term.as_str()).copied() else { continue };

			for (idx, freqs) in self.term_freqs.iter().enumerate() {
				let Some(tf) = freqs.get(term.as_str()).copied() else { continue };
				let tf = tf as f32;
				let dl = self.doc_lens[idx] as f32;
				let norm = tf + BM25_K1 * (1.0 - BM25_B + BM25_B * dl / self.avgdl);

				scores[idx] += idf * (tf * (BM25_K1 + 1.0)) / norm;
			}
		}

		scores
	}

	pub fn score_query(&self, query: &str) -> Vec<f32> {
		self.scores(&tokenizer::tokenize(query))
	}

	/// Best `limit` documents by BM25 score, lower index first on ties.
	pub fn top_n(&self, query_terms: &[String], limit: usize) -> Vec<ScoredCandidate> {
		crate::ranking::top_scores(&self.scores(query_terms), limit)
	}
}

fn compute_idf(doc_freq: &HashMap<String, u32>, doc_count: usize) -> HashMap<String, f32> {
	let n = doc_count as f32;
	let mut idf = HashMap::with_capacity(doc_freq.len());
	let mut idf_sum = 0.0_f32;
	let mut negative = Vec::new();

	for (term, df) in doc_freq {
		let df = *df as f32;
		let value = ((n - df + 0.5) / (df + 0.5)).ln();

		idf_sum += value;

		if value < 0.0 {
			negative.push(term.clone());
		}

		idf.insert(term.clone(), value);
	}

	if !idf.is_empty() {
		let floor = BM25_EPSILON * idf_sum / idf.len() as f32;

		for term in negative {
			idf.insert(term, floor);
		}
	}

	idf
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus() -> Bm25 {
		Bm25::from_texts([
			"project update meeting notes",
			"lunch menu for Friday",
			"quarterly budget review meeting",
			"budget budget budget planning",
			"weekly status sync",
		])
	}

	#[test]
	fn documents_without_terms_score_zero() {
		let scores = corpus().score_query("lunch");

		assert!(scores[1] > 0.0);
		assert_eq!(scores[0], 0.0);
		assert_eq!(scores[2], 0.0);
		assert_eq!(scores[3], 0.0);
		assert_eq!(scores[4], 0.0);
	}

	#[test]
	fn higher_term_frequency_ranks_first() {
		let top = corpus().top_n(&tokenizer::tokenize("budget"), 5);

		assert_eq!(top[0].document_index, 3);
		assert_eq!(top[1].document_index, 2);
		assert_eq!(top.len(), 5);
		assert_eq!(top[2].score, 0.0);
	}

	#[test]
	fn stop_word_query_scores_all_zero() {
		let bm25 = Bm25::from_texts(["the cat sat", "a dog ran"]);
		let scores = bm25.score_query("the");

		assert_eq!(scores, vec![0.0, 0.0]);
	}

	#[test]
	fn empty_corpus_and_empty_query_are_tolerated() {
		let empty = Bm25::new(&[]);

		assert!(empty.score_query("meeting").is_empty());
		assert!(empty.top_n(&["meeting".to_string()], 5).is_empty());
		assert_eq!(corpus().scores(&[]), vec![0.0; 5]);
	}

	#[test]
	fn all_empty_documents_score_zero() {
		let bm25 = Bm25::new(&[Vec::new(), Vec::new()]);

		assert_eq!(bm25.average_doc_len(), 0.0);
		assert_eq!(bm25.scores(&["x".to_string()]), vec![0.0, 0.0]);
	}

	#[test]
	fn common_terms_get_floored_idf() {
		let bm25 = Bm25::from_texts(["alpha beta", "alpha gamma", "alpha delta", "epsilon zeta"]);
		let idf = bm25.idf("alpha").expect("alpha must be indexed");

		assert!(idf > 0.0, "negative IDF must be floored, got {idf}");
		assert!(bm25.idf("missing").is_none());
	}
}
