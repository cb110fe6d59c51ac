//! Turns raw mail-API messages into searchable [`Document`]s.
//!
//! Only the minimal message shape is understood: headers, a MIME part tree with base64url body
//! data and an optional snippet. Messages without usable text are excluded with a warning; the
//! batch itself never fails.

use base64::{
	Engine as _,
	alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Deserialize, Serialize};

use crate::Document;

const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&alphabet::URL_SAFE,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MailMessage {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub snippet: Option<String>,
	#[serde(default)]
	pub payload: Option<MailPart>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailPart {
	#[serde(default)]
	pub mime_type: Option<String>,
	#[serde(default)]
	pub headers: Vec<MailHeader>,
	#[serde(default)]
	pub body: Option<MailBody>,
	#[serde(default)]
	pub parts: Vec<MailPart>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MailHeader {
	pub name: String,
	pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MailBody {
	#[serde(default)]
	pub data: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
	MissingId,
	MissingPayload,
	NoUsableBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Exclusion {
	pub id: String,
	pub reason: ExclusionReason,
}

#[derive(Debug, Default)]
pub struct Preprocessed {
	pub documents: Vec<Document>,
	pub excluded: Vec<Exclusion>,
}

pub fn preprocess(messages: &[MailMessage]) -> Preprocessed {
	let mut out = Preprocessed::default();

	for message in messages {
		match to_document(message) {
			Ok(document) => out.documents.push(document),
			Err(reason) => {
				tracing::warn!(message_id = %message.id, ?reason, "Mail message excluded from search.");

				out.excluded.push(Exclusion { id: message.id.clone(), reason });
			},
		}
	}

	out
}

pub fn to_document(message: &MailMessage) -> Result<Document, ExclusionReason> {
	if message.id.trim().is_empty() {
		return Err(ExclusionReason::MissingId);
	}

	let Some(payload) = message.payload.as_ref() else {
		return Err(ExclusionReason::MissingPayload);
	};
	let sender = header_value(payload, "From").unwrap_or_default();
	let subject = header_value(payload, "Subject").unwrap_or_default();
	let snippet = message.snippet.as_deref().map(str::trim).filter(|s| !s.is_empty());
	let body = find_body(payload, "text/plain")
		.or_else(|| find_body(payload, "text/html"))
		.or_else(|| snippet.map(str::to_string))
		.ok_or(ExclusionReason::NoUsableBody)?;

	Ok(Document::new(
		message.id.clone(),
		format!("from: {sender}\n\nsubject: {subject}\n\nbody: {body}"),
	))
}

pub fn header_value<'a>(part: &'a MailPart, name: &str) -> Option<&'a str> {
	part.headers
		.iter()
		.find(|header| header.name.eq_ignore_ascii_case(name))
		.map(|header| header.value.as_str())
}

/// Depth-first search for the first part of `mime_type` whose body decodes to non-empty text.
pub fn find_body(part: &MailPart, mime_type: &str) -> Option<String> {
	let matches = part
		.mime_type
		.as_deref()
		.map(|value| value.eq_ignore_ascii_case(mime_type))
		.unwrap_or(false);

	if matches && let Some(data) = part.body.as_ref().and_then(|body| body.data.as_deref()) {
		match decode_body(data) {
			Some(text) if !text.trim().is_empty() => return Some(text),
			Some(_) => {},
			None => tracing::warn!(mime_type, "Mail body data could not be decoded."),
		}
	}

	part.parts.iter().find_map(|child| find_body(child, mime_type))
}

/// Base64url with optional padding, decoded to UTF-8.
pub fn decode_body(data: &str) -> Option<String> {
	let bytes = BODY_ENGINE.decode(data.trim()).ok()?;

	String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encode(text: &str) -> String {
		base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(text)
	}

	fn message(id: &str, payload: serde_json::Value) -> MailMessage {
		serde_json::from_value(serde_json::json!({ "id": id, "payload": payload }))
			.expect("message fixture must deserialize")
	}

	#[test]
	fn prefers_plain_text_over_html() {
		let msg = message(
			"m1",
			serde_json::json!({
				"headers": [
					{ "name": "From", "value": "alice@example.com" },
					{ "name": "subject", "value": "Budget" }
				],
				"parts": [
					{ "mimeType": "text/html", "body": { "data": encode("<p>html</p>") } },
					{ "mimeType": "text/plain", "body": { "data": encode("plain body") } }
				]
			}),
		);
		let doc = to_document(&msg).expect("message must be usable");

		assert_eq!(doc.id, "m1");
		assert_eq!(doc.text, "from: alice@example.com\n\nsubject: Budget\n\nbody: plain body");
	}

	#[test]
	fn walks_nested_multipart() {
		let msg = message(
			"m2",
			serde_json::json!({
				"mimeType": "multipart/mixed",
				"parts": [{
					"mimeType": "multipart/alternative",
					"parts": [{ "mimeType": "text/html", "body": { "data": encode("<b>hi</b>") } }]
				}]
			}),
		);
		let doc = to_document(&msg).expect("nested html must be found");

		assert!(doc.text.ends_with("body: <b>hi</b>"));
	}

	#[test]
	fn single_part_payload_body_is_used() {
		let msg = message(
			"m3",
			serde_json::json!({ "mimeType": "text/plain", "body": { "data": "aGVsbG8=" } }),
		);

		assert!(to_document(&msg).expect("body must be used").text.ends_with("body: hello"));
	}

	#[test]
	fn falls_back_to_snippet() {
		let mut msg = message("m4", serde_json::json!({ "parts": [] }));

		msg.snippet = Some("short preview".to_string());

		assert!(to_document(&msg).expect("snippet must be used").text.ends_with("body: short preview"));
	}

	#[test]
	fn message_without_any_text_is_excluded() {
		let messages = vec![
			message("keep", serde_json::json!({
				"parts": [{ "mimeType": "text/plain", "body": { "data": encode("ok") } }]
			})),
			message("drop", serde_json::json!({
				"parts": [{ "mimeType": "image/png", "body": { "data": encode("png") } }]
			})),
			MailMessage { id: "nopayload".to_string(), ..Default::default() },
		];
		let out = preprocess(&messages);

		assert_eq!(out.documents.len(), 1);
		assert_eq!(out.documents[0].id, "keep");
		assert_eq!(out.excluded, vec![
			Exclusion { id: "drop".to_string(), reason: ExclusionReason::NoUsableBody },
			Exclusion { id: "nopayload".to_string(), reason: ExclusionReason::MissingPayload },
		]);
	}

	#[test]
	fn undecodable_body_is_skipped() {
		let msg = message(
			"m5",
			serde_json::json!({ "parts": [{ "mimeType": "text/plain", "body": { "data": "!!!" } }] }),
		);

		assert_eq!(to_document(&msg), Err(ExclusionReason::NoUsableBody));
	}
}
