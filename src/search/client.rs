//! GitHub repository search client
//!
//! Issues a single star-sorted search request, retried under a [`RetryPolicy`].

use super::SearchQuery;
use super::resilient_http::{RetryPolicy, is_rate_limited};
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tick::Clock;
use url::Url;

const LOG_TARGET: &str = "    search";

/// Default GitHub repository search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://api.github.com/search/repositories";

/// Largest page size the search API accepts
pub const MAX_PER_PAGE: u8 = 100;

const USER_AGENT: &str = "repo-trends";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an error response body is kept in the error message
const ERROR_BODY_PREVIEW: usize = 200;

/// A repository as returned by the search API, with only the fields we report on
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryResult {
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
}

impl RepositoryResult {
    /// The description with surrounding whitespace removed, empty if absent
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.as_deref().map_or("", str::trim)
    }

    /// The primary language, or `-` if GitHub could not determine one
    #[must_use]
    pub fn language_text(&self) -> &str {
        self.language.as_deref().unwrap_or("-")
    }
}

/// Search API response body
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,

    #[serde(default)]
    pub items: Vec<RepositoryResult>,
}

/// Status and body of one search attempt, before interpretation
#[derive(Debug)]
struct RawResponse {
    status: StatusCode,
    body: String,
}

/// Search API client
pub struct Client {
    client: reqwest::Client,
    search_url: Url,
    policy: RetryPolicy,
    clock: Clock,
}

impl core::fmt::Debug for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("search_url", &self.search_url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client authenticating with `token` against `search_url`
    pub fn new(token: &str, search_url: Url) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}")).into_app_err("invalid characters in GitHub token")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            search_url,
            policy: RetryPolicy::default(),
            clock: Clock::new_tokio(),
        })
    }

    /// Replace the retry policy and the clock used to wait between attempts
    #[must_use]
    pub fn with_retry(self, policy: RetryPolicy, clock: Clock) -> Self {
        Self { policy, clock, ..self }
    }

    #[must_use]
    pub const fn search_url(&self) -> &Url {
        &self.search_url
    }

    /// Fetch one page of repositories matching `query`, most-starred first.
    ///
    /// `per_page` is clamped to `1..=MAX_PER_PAGE`.
    pub async fn search(&self, query: &SearchQuery, per_page: u8) -> Result<SearchResponse> {
        let q = query.to_string();
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();

        log::info!(target: LOG_TARGET, "Searching repositories with '{q}'");

        let mut url = self.search_url.clone();
        let _ = url
            .query_pairs_mut()
            .append_pair("q", &q)
            .append_pair("sort", "stars")
            .append_pair("order", "desc")
            .append_pair("per_page", &per_page);

        let client = self.client.clone();
        let raw = self
            .policy
            .execute(&self.clock, "github_search", url, should_retry, move |url: Url| {
                let client = client.clone();
                async move { fetch(&client, url).await }
            })
            .await?;

        let response = interpret(raw)?;

        log::debug!(
            target: LOG_TARGET,
            "Received {} item(s) (total matches: {})",
            response.items.len(),
            response.total_count.map_or_else(|| "unknown".to_string(), |n| n.to_string()),
        );

        Ok(response)
    }
}

async fn fetch(client: &reqwest::Client, url: Url) -> Result<RawResponse> {
    let resp = client.get(url).timeout(REQUEST_TIMEOUT).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    Ok(RawResponse { status, body })
}

/// Network errors and rate-limited responses are worth another attempt.
fn should_retry(result: &Result<RawResponse>) -> bool {
    match result {
        Err(_) => true,
        Ok(raw) => is_rate_limited(raw.status, &raw.body),
    }
}

fn interpret(raw: RawResponse) -> Result<SearchResponse> {
    let RawResponse { status, body } = raw;

    if is_rate_limited(status, &body) {
        bail!("GitHub API rate limited (HTTP {status})");
    }

    if !status.is_success() {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
        bail!("search request failed with HTTP {status}: {preview}");
    }

    serde_json::from_str::<SearchResponse>(&body).into_app_err("parsing search response")
}
