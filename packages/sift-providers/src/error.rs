pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Invalid provider config: {message}")]
	InvalidConfig { message: String },
	#[error("Invalid provider response: {message}")]
	InvalidResponse { message: String },
}
impl Error {
	pub(crate) fn response(message: impl Into<String>) -> Self {
		Self::InvalidResponse { message: message.into() }
	}
}
