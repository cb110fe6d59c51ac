use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use sift_config::ProviderConfig;

/// Cross-encoder client for a `/rerank` endpoint scoring (query, document) pairs.
#[derive(Debug, Clone)]
pub struct HttpReranker {
	client: Client,
	cfg: ProviderConfig,
}
impl HttpReranker {
	pub fn new(cfg: ProviderConfig) -> Result<Self> {
		let client = crate::build_client(cfg.timeout_ms, &cfg.api_key, &cfg.default_headers)?;

		Ok(Self { client, cfg })
	}

	pub fn config(&self) -> &ProviderConfig {
		&self.cfg
	}

	/// One relevance score per document, aligned with `docs`.
	pub async fn rerank(&self, query: &str, docs: &[String]) -> Result<Vec<f32>> {
		if docs.is_empty() {
			return Ok(Vec::new());
		}

		let url = format!("{}{}", self.cfg.api_base, self.cfg.path);
		let body = serde_json::json!({
			"model": self.cfg.model,
			"query": query,
			"documents": docs,
			"top_n": docs.len(),
		});

		tracing::debug!(provider_id = %self.cfg.provider_id, count = docs.len(), "Reranking candidates.");

		let res = self.client.post(url).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_rerank_response(json, docs.len())
	}
}

pub fn parse_rerank_response(json: Value, doc_count: usize) -> Result<Vec<f32>> {
	let mut scores: Vec<Option<f32>> = vec![None; doc_count];
	let results = json
		.get("results")
		.or_else(|| json.get("data"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::response("Rerank response is missing results array."))?;

	for item in results {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.ok_or_else(|| Error::response("Rerank result missing index."))? as usize;
		let score = item
			.get("relevance_score")
			.or_else(|| item.get("score"))
			.and_then(|v| v.as_f64())
			.ok_or_else(|| Error::response("Rerank result missing score."))? as f32;
		let Some(slot) = scores.get_mut(index) else {
			return Err(Error::response(format!(
				"Rerank result index {index} is out of range for {doc_count} documents."
			)));
		};

		*slot = Some(score);
	}

	scores
		.into_iter()
		.enumerate()
		.map(|(index, score)| {
			score.ok_or_else(|| Error::response(format!("Rerank response has no score for {index}.")))
		})
		.collect()
}
