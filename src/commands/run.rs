//! Command-line parsing and dispatch for repo-trends

use super::common::{ChatMode, ColorMode, LogLevel, init_logging};
use super::config::Config;
use super::trends::report_trends;
use crate::digest::DEFAULT_LLM_URL;
use crate::search::DEFAULT_SEARCH_URL;
use crate::{Host, Result};
use camino::Utf8PathBuf;
use chrono::Local;
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use std::io::Write;
use url::Url;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Default heading for Markdown reports and chat posts
pub const DEFAULT_TITLE: &str = "今日のGitHubトレンド";

#[derive(Parser, Debug)]
#[command(name = "repo-trends", author, version, long_about = None)]
#[command(about = "Fetch pseudo-trending repositories via the GitHub search API")]
#[command(styles = CLAP_STYLES)]
pub struct Args {
    /// Language filter (e.g. Python, TypeScript)
    #[arg(long, value_name = "LANGUAGE", default_value = "Python")]
    pub language: String,

    /// How many days back the created/pushed date may be
    #[arg(long, value_name = "DAYS", default_value_t = 3)]
    pub days: u32,

    /// How many of the top repositories to show
    #[arg(long, value_name = "COUNT", default_value_t = 5)]
    pub top: usize,

    /// How many repositories to fetch from the API
    #[arg(long, value_name = "COUNT", default_value_t = 30, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub per_page: u8,

    /// Filter on the creation date instead of the last push date
    #[arg(long)]
    pub use_created: bool,

    /// Heading for the Markdown report and the chat post
    #[arg(long, value_name = "TEXT", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Write a Markdown report to this file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub markdown_out: Option<Utf8PathBuf>,

    /// Post the results to the chat webhook in `SLACK_WEBHOOK_URL`
    #[arg(long, help_heading = "Report Output")]
    pub slack: bool,

    /// How to render the chat post
    #[arg(long, value_name = "MODE", default_value = "digest", help_heading = "Report Output")]
    pub chat_mode: ChatMode,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Repository search endpoint
    #[arg(long, value_name = "URL", default_value = DEFAULT_SEARCH_URL, help_heading = "Endpoints")]
    pub search_url: Url,

    /// OpenAI-compatible chat-completions endpoint used for digests
    #[arg(long, value_name = "URL", default_value = DEFAULT_LLM_URL, help_heading = "Endpoints")]
    pub llm_url: Url,
}

/// Parse command-line arguments and run the report
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or if searching, digest
/// generation, writing the report, or posting to chat fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = Args::parse_from(args);
    init_logging(args.log_level);

    let config = match Config::new(&args, &*host) {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(host.error(), "ERROR: {e}");
            host.exit(1);
            return Err(e);
        }
    };

    let now = Local::now();
    report_trends(host, &config, now).await
}
