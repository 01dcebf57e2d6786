//! Chat-completion client that turns repositories into digests

use super::Digest;
use super::prompt::{ChatMessage, digest_messages};
use crate::Result;
use crate::search::RepositoryResult;
use core::time::Duration;
use futures::{Stream, StreamExt, stream};
use ohno::{IntoAppError, app_err, bail};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

const LOG_TARGET: &str = "    digest";

/// Default OpenAI-compatible chat-completions endpoint
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1/chat/completions";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Produces one [`Digest`] per repository by asking a language model.
///
/// Every request is made exactly once; there is no retry and no fallback digest.
#[derive(Debug, Clone)]
pub struct Generator {
    client: reqwest::Client,
    url: Url,
    model: String,
}

impl Generator {
    /// Create a generator using `model` at the chat-completions endpoint `url`
    pub fn new(api_key: &str, model: impl Into<String>, url: Url) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("Bearer {api_key}")).into_app_err("invalid characters in model API key")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder()
            .user_agent("repo-trends")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url,
            model: model.into(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a digest of `repo`
    pub async fn generate(&self, repo: &RepositoryResult) -> Result<Digest> {
        log::info!(target: LOG_TARGET, "Generating digest for '{}'", repo.full_name);

        let messages = digest_messages(repo);
        let request = CompletionRequest {
            model: &self.model,
            messages: &messages,
            response_format: ResponseFormat { format_type: "json_object" },
        };

        let resp = self
            .client
            .post(self.url.clone())
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .into_app_err_with(|| format!("requesting digest for '{}'", repo.full_name))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            bail!("digest request for '{}' failed with HTTP {status}: {preview}", repo.full_name);
        }

        let completion: CompletionResponse = resp
            .json()
            .await
            .into_app_err_with(|| format!("parsing completion response for '{}'", repo.full_name))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| app_err!("model returned no content for '{}'", repo.full_name))?;

        log::debug!(target: LOG_TARGET, "Model output for '{}': {content}", repo.full_name);

        Digest::parse(&content).map_err(|e| app_err!("invalid digest for '{}': {e:#}", repo.full_name))
    }

    /// Lazily generate digests for `repos`, one request at a time and in order.
    ///
    /// A request is only issued once the previous digest has been consumed, so a
    /// consumer that stops at the first error leaves the remaining repositories untouched.
    pub fn digests<'a>(&'a self, repos: &'a [RepositoryResult]) -> impl Stream<Item = Result<Digest>> + 'a {
        stream::iter(repos).then(move |repo| self.generate(repo))
    }
}
