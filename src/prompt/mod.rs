use std::path::Path;
use tracing::debug;

use crate::error::{BlogError, Result};
use crate::helpers;

pub const TOPIC_PLACEHOLDER: &str = "{{TOPIC}}";

/// First line of the topic list, trimmed. Later lines are left for future runs.
pub fn load_topic(path: impl AsRef<Path>) -> Result<String> {
	let path = path.as_ref();
	let content = helpers::read_text(path)?;
	let topic = content.lines().next().map(str::trim).unwrap_or("");
	if topic.is_empty() {
		return Err(BlogError::EmptyTopic { path: path.to_path_buf() });
	}
	debug!(path = %path.display(), topic, "topic loaded");
	Ok(topic.to_string())
}

pub fn load_template(path: impl AsRef<Path>) -> Result<String> {
	helpers::read_text(path)
}

/// Replace every placeholder with the topic. A template without the
/// placeholder comes back unchanged.
pub fn fill_template(template: &str, topic: &str) -> String {
	template.replace(TOPIC_PLACEHOLDER, topic)
}

pub fn build_prompt(path: impl AsRef<Path>, topic: &str) -> Result<String> {
	let template = load_template(path)?;
	if !template.contains(TOPIC_PLACEHOLDER) {
		debug!("template has no {} placeholder", TOPIC_PLACEHOLDER);
	}
	Ok(fill_template(&template, topic))
}
