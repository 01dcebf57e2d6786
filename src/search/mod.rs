//! Repository search against the GitHub search API
//!
//! The search produces a "pseudo-trending" list: repositories in one language that
//! were created or pushed within a recent window, ordered by star count. Only the
//! first page of results is ever fetched.

mod client;
mod query;
mod resilient_http;

pub use client::{Client, DEFAULT_SEARCH_URL, MAX_PER_PAGE, RepositoryResult, SearchResponse};
pub use query::{DateField, SearchQuery, build_query};
pub use resilient_http::{RetryPolicy, is_rate_limited};

#[cfg(test)]
pub(crate) use client::tests::SAMPLE_ITEM;
