use std::sync::Arc;

use sift_service::{PipelineConfig, Providers, SearchService, shared};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
	/// Candidate counts used when a request does not override them.
	pub defaults: PipelineConfig,
}
impl AppState {
	/// Installs the configured providers process-wide on first call and reuses them afterwards.
	pub fn new(config: &sift_config::Config) -> color_eyre::Result<Self> {
		let defaults = PipelineConfig::try_from(&config.search)?;
		let providers = shared::init_with(|| Providers::from_config(&config.providers))?;

		tracing::info!(
			embedding = %config.providers.embedding.model,
			rerank = %config.providers.rerank.model,
			"Scoring providers ready."
		);

		Ok(Self::with_providers(providers.clone(), defaults))
	}

	pub fn with_providers(providers: Providers, defaults: PipelineConfig) -> Self {
		Self { service: Arc::new(SearchService::new(providers)), defaults }
	}
}
