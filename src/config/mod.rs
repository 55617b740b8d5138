use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{BlogError, Result};

pub const BLOG_ID_VAR: &str = "BLOGGER_BLOG_ID";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Parser, Debug)]
#[clap(about = "Generate a blog post for the next topic and publish it")]
pub struct Cli {
	/// Topic list; only the first line is used
	#[clap(long, default_value = "topics.txt")]
	pub topics: PathBuf,
	/// Prompt template containing the {{TOPIC}} placeholder
	#[clap(long, default_value = "prompts/blog_prompt.txt")]
	pub prompt: PathBuf,
	/// Authorized-user credential for the blogging platform
	#[clap(long, default_value = "token.json")]
	pub token: PathBuf,
	#[clap(long, default_value = "https://api.openai.com/v1")]
	pub openai_api_base: String,
	#[clap(long, default_value = "https://www.googleapis.com/blogger/v3")]
	pub blogger_api_base: String,
	/// Timeout applied to every outbound request
	#[clap(long, default_value = "60")]
	pub timeout_secs: u64,
	#[clap(long, default_value = "false")]
	/// write last_request.json and last_response.json for the completion call
	pub write_req_resp: bool,
	#[clap(long)]
	/// print the generated content instead of publishing it
	pub no_publish: bool,
}

pub struct Config {
	pub blog_id: String,
	pub openai_api_key: String,
	pub topics_path: PathBuf,
	pub prompt_path: PathBuf,
	pub token_path: PathBuf,
	pub openai_api_base: Url,
	pub blogger_api_base: Url,
	pub timeout: Duration,
	pub write_req_resp: bool,
	pub publish: bool,
}

impl Config {
	/// Build the run configuration from parsed arguments and an environment
	/// lookup. Every missing variable is reported at once.
	pub fn resolve<F>(cli: Cli, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
		let blog_id = read(BLOG_ID_VAR);
		let api_key = read(API_KEY_VAR);

		let (blog_id, openai_api_key) = match (blog_id, api_key) {
			(Some(blog_id), Some(key)) => (blog_id, key),
			(blog_id, key) => {
				let mut missing = Vec::new();
				if blog_id.is_none() {
					missing.push(BLOG_ID_VAR.to_string());
				}
				if key.is_none() {
					missing.push(API_KEY_VAR.to_string());
				}
				return Err(BlogError::Configuration { missing });
			},
		};

		if cli.timeout_secs == 0 {
			return Err(BlogError::InvalidConfiguration("--timeout-secs must be greater than zero".to_string()));
		}

		Ok(Config {
			blog_id,
			openai_api_key,
			topics_path: cli.topics,
			prompt_path: cli.prompt,
			token_path: cli.token,
			openai_api_base: parse_base("--openai-api-base", &cli.openai_api_base)?,
			blogger_api_base: parse_base("--blogger-api-base", &cli.blogger_api_base)?,
			timeout: Duration::from_secs(cli.timeout_secs),
			write_req_resp: cli.write_req_resp,
			publish: !cli.no_publish,
		})
	}
}

fn parse_base(flag: &str, value: &str) -> Result<Url> {
	let url = Url::parse(value.trim_end_matches('/'))
		.map_err(|e| BlogError::InvalidConfiguration(format!("{} {}: {}", flag, value, e)))?;
	match url.scheme() {
		"http" | "https" => Ok(url),
		other => Err(BlogError::InvalidConfiguration(format!("{} must be http(s), got {}", flag, other))),
	}
}

/// Join a path below an API base, keeping any path prefix the base carries.
pub fn endpoint(base: &Url, path: &str) -> String {
	format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("blog_id", &self.blog_id)
			.field("openai_api_key", &"<redacted>")
			.field("topics_path", &self.topics_path)
			.field("prompt_path", &self.prompt_path)
			.field("token_path", &self.token_path)
			.field("openai_api_base", &self.openai_api_base.as_str())
			.field("blogger_api_base", &self.blogger_api_base.as_str())
			.field("timeout", &self.timeout)
			.field("write_req_resp", &self.write_req_resp)
			.field("publish", &self.publish)
			.finish()
	}
}
