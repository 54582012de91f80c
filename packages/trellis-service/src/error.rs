pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<trellis_storage::Error> for Error {
	fn from(err: trellis_storage::Error) -> Self {
		match err {
			trellis_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			trellis_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			trellis_storage::Error::NotFound(message) => Self::NotFound { message },
			trellis_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<trellis_providers::Error> for Error {
	fn from(err: trellis_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
