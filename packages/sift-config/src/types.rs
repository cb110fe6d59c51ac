use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_SEMANTIC_CANDIDATE_COUNT: u32 = 32;
pub const DEFAULT_FINAL_RESULT_COUNT: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: ProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	/// Maximum number of texts per request. `None` sends the whole corpus in one request.
	#[serde(default)]
	pub batch_size: Option<u32>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Candidate-set sizes for the retrieval pipeline.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Search {
	/// Number of semantic candidates handed to the reranker (K).
	#[serde(default = "default_semantic_candidate_count")]
	pub semantic_candidate_count: u32,
	/// Number of documents returned to the caller (N).
	#[serde(default = "default_final_result_count")]
	pub final_result_count: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			semantic_candidate_count: DEFAULT_SEMANTIC_CANDIDATE_COUNT,
			final_result_count: DEFAULT_FINAL_RESULT_COUNT,
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_semantic_candidate_count() -> u32 {
	DEFAULT_SEMANTIC_CANDIDATE_COUNT
}

fn default_final_result_count() -> u32 {
	DEFAULT_FINAL_RESULT_COUNT
}
