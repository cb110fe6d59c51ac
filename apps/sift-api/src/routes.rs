use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::AppState;
use sift_domain::mail::{self, Exclusion, MailMessage};
use sift_service::{Document, Error, ScoredCandidate, SearchOutcome};

/// A caller's record. Only `text` is searched; the record is returned exactly as received.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchRecord {
	pub id: Value,
	pub text: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl SearchRecord {
	/// Non-string ids are keyed by their JSON text.
	fn to_document(&self) -> Document {
		let id = match &self.id {
			Value::String(id) => id.clone(),
			other => other.to_string(),
		};

		Document::new(id, self.text.as_str())
	}
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub documents: Vec<SearchRecord>,
	#[serde(default)]
	pub semantic_candidate_count: Option<usize>,
	#[serde(default)]
	pub final_result_count: Option<usize>,
	#[serde(default)]
	pub include_trace: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
	pub documents: Vec<SearchRecord>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub trace: Option<SearchTrace>,
	/// Documents dropped before ranking because their text was blank.
	pub dropped: usize,
}

#[derive(Debug, Deserialize)]
pub struct MailSearchRequest {
	pub query: String,
	pub messages: Vec<MailMessage>,
	#[serde(default)]
	pub semantic_candidate_count: Option<usize>,
	#[serde(default)]
	pub final_result_count: Option<usize>,
	#[serde(default)]
	pub include_trace: bool,
}

#[derive(Debug, Serialize)]
pub struct MailSearchResponse {
	pub documents: Vec<Document>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub trace: Option<SearchTrace>,
	pub dropped: usize,
	pub excluded: Vec<Exclusion>,
}

/// Per-stage candidates keyed by document id.
#[derive(Debug, Serialize)]
pub struct SearchTrace {
	pub lexical: Vec<TraceHit>,
	pub semantic: Vec<TraceHit>,
	pub reranked: Vec<TraceHit>,
}
impl SearchTrace {
	fn new(outcome: &SearchOutcome, id_of: impl Fn(usize) -> Option<Value>) -> Self {
		let hits = |stage: &[ScoredCandidate]| -> Vec<TraceHit> {
			stage
				.iter()
				.filter_map(|hit| {
					Some(TraceHit { document_id: id_of(hit.document_index)?, score: hit.score })
				})
				.collect()
		};

		Self {
			lexical: hits(&outcome.stages.lexical),
			semantic: hits(&outcome.stages.semantic),
			reranked: hits(&outcome.stages.reranked),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct TraceHit {
	pub document_id: Value,
	pub score: f32,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Search failed in a scoring provider.");

				ApiError::new(StatusCode::BAD_GATEWAY, "provider_error", message)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/mail", post(search_mail))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let config = state
		.defaults
		.with_overrides(payload.semantic_candidate_count, payload.final_result_count)?;
	let paired: Vec<(Document, SearchRecord)> =
		payload.documents.into_iter().map(|record| (record.to_document(), record)).collect();
	let (kept, dropped) = drop_blank(paired, |(document, _)| document.has_text());
	let (corpus, records): (Vec<Document>, Vec<SearchRecord>) = kept.into_iter().unzip();
	let outcome = state.service.search_with_trace(&corpus, &payload.query, config).await?;
	let trace = payload.include_trace.then(|| {
		SearchTrace::new(&outcome, |index| records.get(index).map(|record| record.id.clone()))
	});
	let documents = outcome
		.selected
		.iter()
		.filter_map(|hit| records.get(hit.document_index).cloned())
		.collect();

	Ok(Json(SearchResponse { documents, trace, dropped }))
}

async fn search_mail(
	State(state): State<AppState>,
	payload: Result<Json<MailSearchRequest>, JsonRejection>,
) -> Result<Json<MailSearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let config = state
		.defaults
		.with_overrides(payload.semantic_candidate_count, payload.final_result_count)?;
	let preprocessed = mail::preprocess(&payload.messages);
	let (corpus, dropped) = drop_blank(preprocessed.documents, Document::has_text);
	let outcome = state.service.search_with_trace(&corpus, &payload.query, config).await?;
	let trace = payload.include_trace.then(|| {
		SearchTrace::new(&outcome, |index| {
			corpus.get(index).map(|document| Value::String(document.id.clone()))
		})
	});

	Ok(Json(MailSearchResponse {
		documents: outcome.documents,
		trace,
		dropped,
		excluded: preprocessed.excluded,
	}))
}

/// Removes records with blank text; returns the kept records and the number removed.
fn drop_blank<T>(records: Vec<T>, has_text: impl Fn(&T) -> bool) -> (Vec<T>, usize) {
	let total = records.len();
	let kept: Vec<T> = records.into_iter().filter(|record| has_text(record)).collect();
	let dropped = total - kept.len();

	if dropped > 0 {
		tracing::debug!(dropped, "Dropped documents with blank text.");
	}

	(kept, dropped)
}
