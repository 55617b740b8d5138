use std::fmt;
use tracing::{error, info};

use crate::blogger::{BloggerSession, NewPost, PublishedPost};
use crate::config::Config;
use crate::error::Result;
use crate::helpers;
use crate::openaiapi::ContentGenerator;
use crate::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Start,
	TopicLoaded,
	PromptBuilt,
	ContentGenerated,
	Published,
	Done,
	Failed,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Stage::Start => "start",
			Stage::TopicLoaded => "topic_loaded",
			Stage::PromptBuilt => "prompt_built",
			Stage::ContentGenerated => "content_generated",
			Stage::Published => "published",
			Stage::Done => "done",
			Stage::Failed => "failed",
		};
		f.write_str(name)
	}
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
	Published(PublishedPost),
	/// Publishing was switched off; the generated body is handed back instead.
	Generated { title: String, content: String },
}

impl Outcome {
	pub fn success_line(&self) -> String {
		match self {
			Outcome::Published(post) => format!("Blog published: {}", post.url),
			Outcome::Generated { title, content } => format!("Generated (not published): {}\n{}", title, content),
		}
	}
}

struct Run {
	stage: Stage,
}

impl Run {
	fn advance(&mut self, next: Stage) {
		info!(from = %self.stage, to = %next, "stage");
		self.stage = next;
	}
}

/// Run the whole flow once. The first failing step aborts everything after it.
pub async fn run(config: &Config) -> Result<Outcome> {
	let mut run = Run { stage: Stage::Start };
	match steps(config, &mut run).await {
		Ok(outcome) => {
			run.advance(Stage::Done);
			Ok(outcome)
		},
		Err(err) => {
			error!(stage = %run.stage, error = %err, "run failed");
			run.advance(Stage::Failed);
			Err(err)
		},
	}
}

async fn steps(config: &Config, run: &mut Run) -> Result<Outcome> {
	let topic = prompt::load_topic(&config.topics_path)?;
	run.advance(Stage::TopicLoaded);

	let prompt = prompt::build_prompt(&config.prompt_path, &topic)?;
	run.advance(Stage::PromptBuilt);

	let client = helpers::http_client(config.timeout)?;
	let mut generator = ContentGenerator::new(&client, &config.openai_api_base, &config.openai_api_key);
	generator.write_req_resp = config.write_req_resp;
	let content = generator.generate(&prompt).await?;
	run.advance(Stage::ContentGenerated);

	if !config.publish {
		return Ok(Outcome::Generated { title: topic, content });
	}

	let session = BloggerSession::authenticate(&client, &config.blogger_api_base, &config.token_path).await?;
	let post = session.insert_post(&config.blog_id, &NewPost::new(&topic, &content)).await?;
	run.advance(Stage::Published);
	info!(id = %post.id, url = %post.url, "post created");
	Ok(Outcome::Published(post))
}
