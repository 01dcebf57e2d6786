//! Model-generated repository digests
//!
//! A digest condenses one search result into a short summary, a reason to care,
//! a few use cases, setup steps, and a difficulty rating. Digests are requested from
//! an OpenAI-compatible chat-completions endpoint and validated before use; output
//! that does not fit the expected shape is an error.

mod generator;
mod prompt;
mod repo_digest;

pub use generator::{DEFAULT_LLM_URL, Generator};
pub use prompt::{ChatMessage, Role, digest_messages};
pub use repo_digest::{Digest, MAX_DIFFICULTY, MIN_DIFFICULTY};
