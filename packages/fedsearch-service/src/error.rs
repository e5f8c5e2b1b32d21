pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Cache error: {message}")]
	Cache { message: String },
}
impl From<fedsearch_providers::Error> for Error {
	fn from(err: fedsearch_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<fedsearch_storage::Error> for Error {
	fn from(err: fedsearch_storage::Error) -> Self {
		match err {
			fedsearch_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			fedsearch_storage::Error::InvalidArgument(message) => Self::Storage { message },
		}
	}
}
