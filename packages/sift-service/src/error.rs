pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl Error {
	pub fn provider(message: impl Into<String>) -> Self {
		Self::Provider { message: message.into() }
	}
}

impl From<sift_providers::Error> for Error {
	fn from(err: sift_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<sift_config::Error> for Error {
	fn from(err: sift_config::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
