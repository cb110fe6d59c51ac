use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use sift_config::{Config, Error, Search};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with_search(semantic_candidate_count: i64, final_result_count: i64) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let search = root
		.get_mut("search")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [search].");

	search.insert(
		"semantic_candidate_count".to_string(),
		Value::Integer(semantic_candidate_count),
	);
	search.insert("final_result_count".to_string(), Value::Integer(final_result_count));

	toml::to_string(&value).expect("Failed to render template config.")
}

fn sample_toml_without_search() -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	root.remove("search");

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("sift_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> sift_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = sift_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn loads_sample_config() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string()).expect("Expected valid config.");

	assert_eq!(cfg.search, Search { semantic_candidate_count: 32, final_result_count: 5 });
	assert_eq!(cfg.providers.embedding.dimensions, 384);
}

#[test]
fn normalizes_api_base_and_batch_size() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string()).expect("Expected valid config.");

	assert_eq!(cfg.providers.embedding.api_base, "http://127.0.0.1:9000");
	assert_eq!(cfg.providers.embedding.batch_size, None);
}

#[test]
fn search_section_defaults_when_missing() {
	let cfg = load_payload(sample_toml_without_search()).expect("Expected valid config.");

	assert_eq!(cfg.search.semantic_candidate_count, sift_config::DEFAULT_SEMANTIC_CANDIDATE_COUNT);
	assert_eq!(cfg.search.final_result_count, sift_config::DEFAULT_FINAL_RESULT_COUNT);
}

#[test]
fn final_result_count_must_not_exceed_candidate_count() {
	let err = load_payload(sample_toml_with_search(4, 8))
		.expect_err("Expected candidate count validation error.");
	let message = err.to_string();

	assert!(
		message.contains(
			"search.final_result_count must be less than or equal to search.semantic_candidate_count."
		),
		"Unexpected error message: {message}"
	);
}

#[test]
fn final_result_count_must_be_positive() {
	let err = load_payload(sample_toml_with_search(32, 0))
		.expect_err("Expected final result count validation error.");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("search.final_result_count must be greater than zero."));
}

#[test]
fn embedding_dimensions_must_be_positive() {
	let mut cfg = base_config();

	cfg.providers.embedding.dimensions = 0;

	let err = sift_config::validate(&cfg).expect_err("Expected dimensions validation error.");

	assert!(
		err.to_string().contains("providers.embedding.dimensions must be greater than zero."),
		"Unexpected error message: {err}"
	);
}

#[test]
fn provider_api_key_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.rerank.api_key = "  ".to_string();

	let err = sift_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert_eq!(err.to_string(), "Provider rerank api_key must be non-empty.");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind = 1".to_string())
		.expect_err("Expected parse error for malformed TOML.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("sift_config_test_missing_file.toml");
	let err = sift_config::load(&path).expect_err("Expected read error for missing file.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
