use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
	#[error("missing resource: {}", path.display())]
	MissingResource { path: PathBuf },
	#[error("topic file {} has no topic on its first line", path.display())]
	EmptyTopic { path: PathBuf },
	#[error("missing required configuration: {}", missing.join(", "))]
	Configuration { missing: Vec<String> },
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),
	#[error("content generation failed: {0}")]
	Generation(String),
	#[error("authentication failed: {0}")]
	Authentication(String),
	#[error("publish rejected (status {}): {payload}", status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()))]
	Publish { status: Option<u16>, payload: String },
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
	#[error("Serde error: {0}")]
	Json(#[from] serde_json::Error),
}

impl BlogError {
	pub fn generation<M: Into<String>>(msg: M) -> Self {
		BlogError::Generation(msg.into())
	}

	pub fn authentication<M: Into<String>>(msg: M) -> Self {
		BlogError::Authentication(msg.into())
	}

	pub fn publish<M: Into<String>>(status: Option<u16>, payload: M) -> Self {
		BlogError::Publish { status, payload: payload.into() }
	}
}

pub type Result<T> = std::result::Result<T, BlogError>;
