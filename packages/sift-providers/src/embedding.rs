use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use sift_config::EmbeddingProviderConfig;

/// Bi-encoder client for an OpenAI-compatible `/embeddings` endpoint.
///
/// The HTTP client is built once and reused by every call.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
	client: Client,
	cfg: EmbeddingProviderConfig,
}
impl HttpEmbedder {
	pub fn new(cfg: EmbeddingProviderConfig) -> Result<Self> {
		let client = crate::build_client(cfg.timeout_ms, &cfg.api_key, &cfg.default_headers)?;

		Ok(Self { client, cfg })
	}

	pub fn config(&self) -> &EmbeddingProviderConfig {
		&self.cfg
	}

	/// Embeds `texts` in input order, split into `batch_size` requests when configured.
	pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		if texts.is_empty() {
			return Ok(Vec::new());
		}

		let batch_size = match self.cfg.batch_size {
			Some(size) if size > 0 => size as usize,
			_ => texts.len(),
		};
		let mut out = Vec::with_capacity(texts.len());

		for batch in texts.chunks(batch_size) {
			let vectors = self.embed_batch(batch).await?;

			out.extend(vectors);
		}

		Ok(out)
	}

	async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let url = format!("{}{}", self.cfg.api_base, self.cfg.path);
		let body = serde_json::json!({
			"model": self.cfg.model,
			"input": texts,
			"dimensions": self.cfg.dimensions,
		});

		tracing::debug!(provider_id = %self.cfg.provider_id, count = texts.len(), "Embedding batch.");

		let res = self.client.post(url).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_embedding_response(json, texts.len(), self.cfg.dimensions as usize)
	}
}

pub fn parse_embedding_response(
	json: Value,
	expected: usize,
	dimensions: usize,
) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::response("Embedding response is missing data array."))?;

	if data.len() != expected {
		return Err(Error::response(format!(
			"Embedding response has {} vectors, expected {expected}.",
			data.len()
		)));
	}

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| Error::response("Embedding item missing embedding array."))?;

		if embedding.len() != dimensions {
			return Err(Error::response(format!(
				"Embedding has {} dimensions, expected {dimensions}.",
				embedding.len()
			)));
		}

		let mut vec = Vec::with_capacity(embedding.len());

		for value in embedding {
			let number =
				value.as_f64().ok_or_else(|| Error::response("Embedding value must be numeric."))?;

			vec.push(number as f32);
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	for (position, (index, _)) in indexed.iter().enumerate() {
		if *index != position {
			return Err(Error::response("Embedding response indices are not contiguous."));
		}
	}

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
