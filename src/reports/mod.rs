//! Report generation for search results
//!
//! Three renderers consume the same star-ordered result list:
//! - **Console**: one line per repository, optionally colored
//! - **Markdown**: a titled, timestamped document with one section per repository
//! - **Chat**: webhook text, either plain or enriched with model digests
//!
//! Every renderer shows at most the display count of leading results, in the
//! order received, and writes into any `core::fmt::Write`.

mod chat;
mod common;
mod console;
mod markdown;

pub use chat::{MAX_SETUP_STEPS, MAX_USE_CASES, generate_plain as generate_chat_plain, generate_with_digests as generate_chat_digest};
pub use console::generate as generate_console;
pub use markdown::generate as generate_markdown;

#[cfg(test)]
pub(crate) fn test_items(count: u64) -> Vec<crate::search::RepositoryResult> {
    (1..=count)
        .map(|i| {
            let json = format!(
                r#"{{
                    "full_name": "owner/repo-{i}",
                    "html_url": "https://github.com/owner/repo-{i}",
                    "description": "Repository number {i} does things",
                    "language": "Rust",
                    "stargazers_count": {stars},
                    "created_at": "2025-09-01T08:00:00Z",
                    "pushed_at": "2025-09-04T12:30:00Z"
                }}"#,
                stars = 200 / i
            );
            serde_json::from_str(&json).unwrap()
        })
        .collect()
}
