//! Blogger credential handling and post insertion.
//!
//! The credential artifact is the authorized-user JSON produced by the
//! platform's OAuth tooling. It is read once, never written back, and the
//! access token it yields lives only inside a [`BloggerSession`].

use std::fmt;
use std::path::Path;
use chrono::{DateTime, Duration, Utc};
use serde_derive::{Deserialize, Serialize};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use crate::config;
use crate::error::{BlogError, Result};
use crate::helpers;

pub const POST_KIND: &str = "blogger#post";
pub const LABELS: [&str; 3] = ["AI", "Automation", "Blogging"];
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_SKEW_SECS: i64 = 225;

fn default_token_uri() -> String {
	DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
pub struct Credential {
	#[serde(default)]
	token: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	client_id: Option<String>,
	#[serde(default)]
	client_secret: Option<String>,
	#[serde(default = "default_token_uri")]
	token_uri: String,
	#[serde(default)]
	expiry: Option<DateTime<Utc>>,
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credential")
			.field("has_token", &self.token.is_some())
			.field("token_uri", &self.token_uri)
			.field("expiry", &self.expiry)
			.finish()
	}
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
	grant_type: &'a str,
	refresh_token: &'a str,
	client_id: &'a str,
	client_secret: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
	access_token: Option<String>,
}

impl Credential {
	pub fn from_authorized_user_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = helpers::read_text(path)?;
		let credential: Credential = serde_json::from_str(&content)
			.map_err(|e| BlogError::authentication(format!("{} is not a valid credential: {}", path.display(), e)))?;

		let mut missing = Vec::new();
		if credential.refresh_token.as_deref().map_or(true, str::is_empty) {
			missing.push("refresh_token");
		}
		if credential.client_id.as_deref().map_or(true, str::is_empty) {
			missing.push("client_id");
		}
		if credential.client_secret.as_deref().map_or(true, str::is_empty) {
			missing.push("client_secret");
		}
		if !missing.is_empty() {
			return Err(BlogError::authentication(format!("{} is missing {}", path.display(), missing.join(", "))));
		}
		Ok(credential)
	}

	/// The stored access token, if there is one and it is not about to expire.
	pub fn usable_token(&self, now: DateTime<Utc>) -> Option<&str> {
		let token = self.token.as_deref().filter(|t| !t.is_empty())?;
		match self.expiry {
			Some(expiry) if expiry - Duration::seconds(EXPIRY_SKEW_SECS) <= now => None,
			_ => Some(token),
		}
	}

	async fn refresh(&self, client: &reqwest::Client) -> Result<String> {
		let request = RefreshRequest {
			grant_type: "refresh_token",
			refresh_token: self.refresh_token.as_deref().unwrap_or_default(),
			client_id: self.client_id.as_deref().unwrap_or_default(),
			client_secret: self.client_secret.as_deref().unwrap_or_default(),
		};
		let form = serde_urlencoded::to_string(&request)
			.map_err(|e| BlogError::authentication(format!("cannot encode refresh request: {}", e)))?;
		debug!(token_uri = %self.token_uri, "refreshing access token");
		let resp = client
			.post(&self.token_uri)
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body(form)
			.send()
			.await
			.map_err(|e| BlogError::authentication(format!("token refresh request failed: {}", e)))?;
		let status = resp.status();
		let body = resp.text().await
			.map_err(|e| BlogError::authentication(format!("reading token response failed: {}", e)))?;
		if !status.is_success() {
			return Err(BlogError::authentication(format!("token endpoint returned {}: {}", status, body)));
		}
		let parsed: RefreshResponse = serde_json::from_str(&body)
			.map_err(|e| BlogError::authentication(format!("token response is not valid JSON: {}", e)))?;
		parsed.access_token
			.filter(|t| !t.is_empty())
			.ok_or_else(|| BlogError::authentication("token response has no access_token"))
	}
}

#[derive(Serialize, Debug)]
pub struct NewPost<'a> {
	kind: &'a str,
	pub title: &'a str,
	pub content: &'a str,
	pub labels: Vec<&'a str>,
}

impl<'a> NewPost<'a> {
	pub fn new(title: &'a str, content: &'a str) -> Self {
		NewPost { kind: POST_KIND, title, content, labels: LABELS.to_vec() }
	}
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PublishedPost {
	#[serde(default)]
	pub id: String,
	pub url: String,
}

/// Authenticated access to the blogging API for a single run. Consumed by
/// [`BloggerSession::insert_post`]; the bearer token is cleared on drop.
pub struct BloggerSession<'a> {
	client: &'a reqwest::Client,
	api_base: Url,
	access_token: String,
}

impl<'a> BloggerSession<'a> {
	pub async fn authenticate(client: &'a reqwest::Client, api_base: &Url, token_path: impl AsRef<Path>) -> Result<BloggerSession<'a>> {
		let credential = Credential::from_authorized_user_file(token_path)?;
		let access_token = match credential.usable_token(Utc::now()) {
			Some(token) => token.to_string(),
			None => {
				info!("stored access token missing or expired, refreshing");
				credential.refresh(client).await?
			},
		};
		Ok(BloggerSession { client, api_base: api_base.clone(), access_token })
	}

	/// Create the post with publishing enabled. Not idempotent: every
	/// successful call creates a new public post.
	pub async fn insert_post(self, blog_id: &str, post: &NewPost<'_>) -> Result<PublishedPost> {
		let url = config::endpoint(&self.api_base, &format!("blogs/{}/posts", blog_id));
		debug!(%url, title = post.title, "inserting post");
		let resp = self.client
			.post(&url)
			.query(&[("isDraft", "false")])
			.header(AUTHORIZATION, format!("Bearer {}", self.access_token))
			.json(post)
			.send()
			.await
			.map_err(|e| BlogError::publish(None, format!("request failed: {}", e)))?;
		let status = resp.status();
		let body = resp.text().await
			.map_err(|e| BlogError::publish(Some(status.as_u16()), format!("reading response failed: {}", e)))?;
		match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
				warn!(%status, "blogging platform refused the credential");
				Err(BlogError::authentication(format!("blogging platform returned {}: {}", status, body)))
			},
			s if !s.is_success() => Err(BlogError::publish(Some(s.as_u16()), body)),
			_ => serde_json::from_str::<PublishedPost>(&body)
				.map_err(|e| BlogError::publish(Some(status.as_u16()), format!("unexpected insert response ({}): {}", e, body))),
		}
	}
}

impl Drop for BloggerSession<'_> {
	fn drop(&mut self) {
		self.access_token.clear();
	}
}
