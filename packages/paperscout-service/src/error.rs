use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures that abort a whole run. Per-paper failures are recorded in the result instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Discovery unavailable: {message}")]
	DiscoveryUnavailable { message: String },
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
	#[error("Failed to write report at {path:?}.")]
	WriteReport { path: PathBuf, source: std::io::Error },
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	TimeFormat(#[from] time::error::Format),
}
impl From<paperscout_config::Error> for Error {
	fn from(err: paperscout_config::Error) -> Self {
		Self::InvalidConfig { message: err.to_string() }
	}
}
