use std::fs;
use serde_derive::Serialize;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info};
use url::Url;

use crate::config;
use crate::error::{BlogError, Result};

pub const MODEL: &str = "gpt-4o-mini";
pub const TEMPERATURE: f64 = 0.7;

#[derive(Serialize, Debug)]
pub struct Message {
	pub role: String,
	pub content: String,
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
	model: String,
	messages: Vec<Message>,
	temperature: f64,
}

impl ChatRequest {
	pub fn for_prompt(prompt: &str) -> Self {
		ChatRequest {
			model: MODEL.to_string(),
			messages: vec![Message { role: "user".to_string(), content: prompt.to_string() }],
			temperature: TEMPERATURE,
		}
	}
}

pub struct ContentGenerator<'a> {
	client: &'a reqwest::Client,
	post_url: String,
	api_key: &'a str,
	pub write_req_resp: bool,
}

impl<'a> ContentGenerator<'a> {
	pub fn new(client: &'a reqwest::Client, api_base: &Url, api_key: &'a str) -> Self {
		ContentGenerator {
			client,
			post_url: config::endpoint(api_base, "chat/completions"),
			api_key,
			write_req_resp: false,
		}
	}

	/// One completion request; returns the text of the first choice.
	pub async fn generate(&self, prompt: &str) -> Result<String> {
		if prompt.trim().is_empty() {
			return Err(BlogError::generation("prompt is empty"));
		}
		let serialised = serde_json::to_string_pretty(&ChatRequest::for_prompt(prompt))?;
		if self.write_req_resp {
			fs::write("last_request.json", &serialised)?;
		}
		debug!(url = %self.post_url, model = MODEL, "sending completion request");
		let resp = self.client
			.post(&self.post_url)
			.header(AUTHORIZATION, format!("Bearer {}", self.api_key))
			.header(CONTENT_TYPE, "application/json")
			.body(serialised)
			.send()
			.await
			.map_err(|e| BlogError::generation(format!("request failed: {}", e)))?;
		let status = resp.status();
		let body = resp.text().await
			.map_err(|e| BlogError::generation(format!("reading response failed: {}", e)))?;
		if self.write_req_resp {
			fs::write("last_response.json", &body)?;
		}
		if !status.is_success() {
			return Err(BlogError::generation(format!("completion endpoint returned {}: {}", status, body)));
		}
		let content = Self::parse_response(&body)?;
		info!(chars = content.len(), "content generated");
		Ok(content)
	}

	pub fn parse_response(response: &str) -> Result<String> {
		let json: serde_json::Value = serde_json::from_str(response)
			.map_err(|e| BlogError::generation(format!("response is not JSON: {}", e)))?;
		let content = json
			.get("choices").ok_or_else(|| BlogError::generation("No choices in the return object"))?
			.get(0).ok_or_else(|| BlogError::generation("No element 0 in the choices object"))?
			.get("message").ok_or_else(|| BlogError::generation("No message in the choices element 0"))?
			.get("content").and_then(|c| c.as_str())
			.ok_or_else(|| BlogError::generation("No text content in the first choice"))?;
		Ok(content.to_string())
	}
}
