use std::fs::File;
use std::io::{self, Read, ErrorKind};
use std::path::Path;
use std::time::Duration;

use crate::error::{BlogError, Result};

const USER_AGENT: &str = concat!("blogpost/", env!("CARGO_PKG_VERSION"));

fn open_resource(file_path: &Path) -> Result<File> {
	File::open(file_path).map_err(|err| match err.kind() {
		ErrorKind::NotFound => BlogError::MissingResource { path: file_path.to_path_buf() },
		_ => BlogError::Io(err),
	})
}

/// Read a whole text file. A file that does not exist is reported as
/// `BlogError::MissingResource` rather than a plain IO error.
pub fn read_text(file_path: impl AsRef<Path>) -> Result<String> {
	let mut file = open_resource(file_path.as_ref())?;
	let mut content = String::new();
	file.read_to_string(&mut content)?;
	Ok(content)
}

/// One client per run: fixed timeout, no retries.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
	reqwest::Client::builder()
		.timeout(timeout)
		.user_agent(USER_AGENT)
		.build()
		.map_err(|e| BlogError::Io(io::Error::new(ErrorKind::Other, e)))
}
