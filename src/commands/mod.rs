//! Command-line interface and orchestration for repo-trends
//!
//! A run resolves a [`Config`] once from the command line and the host
//! environment, then executes the report pipeline:
//!
//! 1. Build the search query from the language and date window
//! 2. Fetch one page of star-sorted results, retrying rate-limited requests
//! 3. Print a one-line-per-repository console summary
//! 4. Optionally write the Markdown report
//! 5. Optionally post to the chat webhook, generating digests first in digest mode
//!
//! Any failure ends the run; there is no per-repository recovery. The only
//! non-fatal condition is a requested chat post without a configured webhook.

mod common;
mod config;
mod host;
mod run;
mod trends;

pub use common::{ChatMode, ColorMode, LogLevel};
pub use config::{
    ChatDelivery, ChatTarget, Config, DEFAULT_MODEL, GITHUB_TOKEN_VAR, MODEL_API_KEY_VAR, MODEL_NAME_VAR, ModelConfig,
    WEBHOOK_URL_VAR,
};
pub use host::Host;
pub use run::{Args, DEFAULT_TITLE, run};
pub use trends::report_trends;
