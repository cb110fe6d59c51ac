mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_FINAL_RESULT_COUNT, DEFAULT_SEMANTIC_CANDIDATE_COUNT, EmbeddingProviderConfig,
	ProviderConfig, Providers, Search, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let embedding = &cfg.providers.embedding;
	let rerank = &cfg.providers.rerank;

	for (label, api_base, path, model, api_key, timeout_ms) in [
		(
			"embedding",
			&embedding.api_base,
			&embedding.path,
			&embedding.model,
			&embedding.api_key,
			embedding.timeout_ms,
		),
		("rerank", &rerank.api_base, &rerank.path, &rerank.model, &rerank.api_key, rerank.timeout_ms),
	] {
		for (field, value) in [("api_base", api_base), ("path", path), ("model", model)] {
			if value.trim().is_empty() {
				return Err(Error::Validation {
					message: format!("providers.{label}.{field} must be non-empty."),
				});
			}
		}

		if api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	validate_search(&cfg.search)
}

/// Checks the candidate-set invariant `0 < N <= K`.
pub fn validate_search(search: &Search) -> Result<()> {
	if search.semantic_candidate_count == 0 {
		return Err(Error::Validation {
			message: "search.semantic_candidate_count must be greater than zero.".to_string(),
		});
	}
	if search.final_result_count == 0 {
		return Err(Error::Validation {
			message: "search.final_result_count must be greater than zero.".to_string(),
		});
	}
	if search.final_result_count > search.semantic_candidate_count {
		return Err(Error::Validation {
			message: "search.final_result_count must be less than or equal to search.semantic_candidate_count."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in [&mut cfg.providers.embedding.api_base, &mut cfg.providers.rerank.api_base] {
		let trimmed = api_base.trim().trim_end_matches('/').to_string();

		*api_base = trimmed;
	}

	if cfg.providers.embedding.batch_size == Some(0) {
		cfg.providers.embedding.batch_size = None;
	}
}
