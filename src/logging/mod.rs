use std::env;
use std::io;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use thiserror::Error;

static LOGGING_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("invalid logging filter: {0}")]
	Filter(#[from] ParseError),
	#[error("failed to install logging subscriber: {0}")]
	Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the stderr subscriber. The first call wins; later calls do nothing.
pub fn init_logging() -> Result<(), LoggingError> {
	if LOGGING_INSTALLED.get().is_some() {
		return Ok(());
	}
	let filter = build_filter(env::var("BLOGPOST_LOG").ok())?;
	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_target(true)
				.with_writer(io::stderr)
				.with_ansi(false),
		)
		.try_init()?;
	let _ = LOGGING_INSTALLED.set(());
	Ok(())
}

fn build_filter(spec: Option<String>) -> Result<EnvFilter, ParseError> {
	if let Some(spec) = spec {
		if !spec.trim().is_empty() {
			return EnvFilter::try_new(spec);
		}
	}

	match EnvFilter::try_from_default_env() {
		Ok(filter) => Ok(filter),
		Err(_) => EnvFilter::try_new("info"),
	}
}
