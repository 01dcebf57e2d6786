//! Run configuration, resolved once from the command line and the environment.

use super::Host;
use super::common::ChatMode;
use super::run::Args;
use crate::Result;
use crate::search::{DateField, RetryPolicy};
use camino::Utf8PathBuf;
use ohno::{IntoAppError, bail};
use url::Url;

/// Environment variable holding the GitHub token used for searching
pub const GITHUB_TOKEN_VAR: &str = "TREND_READ_GITHUB_TOKEN";

/// Environment variable holding the chat webhook URL
pub const WEBHOOK_URL_VAR: &str = "SLACK_WEBHOOK_URL";

/// Environment variable holding the model API key
pub const MODEL_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable selecting the model
pub const MODEL_NAME_VAR: &str = "OPENAI_MODEL";

/// Model used when `OPENAI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Language-model settings for digest generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub url: Url,
}

/// How the chat post is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatDelivery {
    Plain,
    Digest(ModelConfig),
}

/// Whether and where the run posts to chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    /// Chat posting was not requested
    Disabled,

    /// Chat posting was requested but no webhook is configured
    MissingWebhook,

    /// Post to `webhook`
    Enabled { webhook: Url, delivery: ChatDelivery },
}

/// Everything a run needs, resolved up front
#[derive(Debug, Clone)]
pub struct Config {
    pub language: String,
    pub days: u32,
    pub date_field: DateField,
    pub top: usize,
    pub per_page: u8,
    pub title: String,
    pub markdown_out: Option<Utf8PathBuf>,
    pub github_token: String,
    pub search_url: Url,
    pub retry: RetryPolicy,
    pub chat: ChatTarget,
    pub use_colors: bool,
}

impl Config {
    /// Resolve the configuration from parsed arguments and the host environment.
    ///
    /// # Errors
    ///
    /// Fails when the GitHub token is missing, when the webhook URL is malformed, or
    /// when a digest-mode chat post lacks model credentials.
    pub fn new<H: Host>(args: &Args, host: &H) -> Result<Self> {
        let Some(github_token) = non_empty_var(host, GITHUB_TOKEN_VAR) else {
            bail!("{GITHUB_TOKEN_VAR} is not set; define it in the environment or in a .env file");
        };

        let chat = if args.slack {
            Self::chat_target(args, host)?
        } else {
            ChatTarget::Disabled
        };

        Ok(Self {
            language: args.language.clone(),
            days: args.days,
            date_field: DateField::from_use_created(args.use_created),
            top: args.top,
            per_page: args.per_page,
            title: args.title.clone(),
            markdown_out: args.markdown_out.clone(),
            github_token,
            search_url: args.search_url.clone(),
            retry: RetryPolicy::default(),
            chat,
            use_colors: args.color.use_colors(),
        })
    }

    fn chat_target<H: Host>(args: &Args, host: &H) -> Result<ChatTarget> {
        let Some(webhook) = non_empty_var(host, WEBHOOK_URL_VAR) else {
            return Ok(ChatTarget::MissingWebhook);
        };

        let webhook = Url::parse(&webhook).into_app_err_with(|| format!("{WEBHOOK_URL_VAR} is not a valid URL"))?;

        let delivery = match args.chat_mode {
            ChatMode::Plain => ChatDelivery::Plain,
            ChatMode::Digest => {
                let Some(api_key) = non_empty_var(host, MODEL_API_KEY_VAR) else {
                    bail!("{MODEL_API_KEY_VAR} is not set; it is required for digest chat posts (or use --chat-mode plain)");
                };

                ChatDelivery::Digest(ModelConfig {
                    api_key,
                    model: non_empty_var(host, MODEL_NAME_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                    url: args.llm_url.clone(),
                })
            }
        };

        Ok(ChatTarget::Enabled { webhook, delivery })
    }
}

fn non_empty_var<H: Host>(host: &H, name: &str) -> Option<String> {
    host.var(name).filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(["repo-trends", "--color", "never"].iter().chain(extra))
    }

    fn host() -> TestHost {
        TestHost::new().with_var(GITHUB_TOKEN_VAR, "ghp_test")
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(&args(&[]), &host()).unwrap();
        assert_eq!(config.language, "Python");
        assert_eq!(config.days, 3);
        assert_eq!(config.date_field, DateField::Pushed);
        assert_eq!(config.top, 5);
        assert_eq!(config.per_page, 30);
        assert_eq!(config.title, "今日のGitHubトレンド");
        assert_eq!(config.markdown_out, None);
        assert_eq!(config.github_token, "ghp_test");
        assert_eq!(config.search_url.as_str(), "https://api.github.com/search/repositories");
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.chat, ChatTarget::Disabled);
        assert!(!config.use_colors);
    }

    #[test]
    fn test_flags() {
        let config = Config::new(
            &args(&["--language", "Rust", "--days", "7", "--top", "10", "--per-page", "50", "--use-created", "--markdown-out", "out.md", "--title", "Weekly"]),
            &host(),
        )
        .unwrap();

        assert_eq!(config.language, "Rust");
        assert_eq!(config.days, 7);
        assert_eq!(config.date_field, DateField::Created);
        assert_eq!(config.top, 10);
        assert_eq!(config.per_page, 50);
        assert_eq!(config.markdown_out, Some(Utf8PathBuf::from("out.md")));
        assert_eq!(config.title, "Weekly");
    }

    #[test]
    fn test_per_page_out_of_range_rejected() {
        assert!(Args::try_parse_from(["repo-trends", "--per-page", "101"]).is_err());
        assert!(Args::try_parse_from(["repo-trends", "--per-page", "0"]).is_err());
    }

    #[test]
    fn test_missing_token() {
        let err = Config::new(&args(&[]), &TestHost::new()).unwrap_err();
        assert!(err.to_string().contains(GITHUB_TOKEN_VAR));
    }

    #[test]
    fn test_blank_token_is_missing() {
        assert!(Config::new(&args(&[]), &TestHost::new().with_var(GITHUB_TOKEN_VAR, "  ")).is_err());
    }

    #[test]
    fn test_slack_without_webhook() {
        let config = Config::new(&args(&["--slack"]), &host()).unwrap();
        assert_eq!(config.chat, ChatTarget::MissingWebhook);
    }

    #[test]
    fn test_slack_plain() {
        let host = host().with_var(WEBHOOK_URL_VAR, "https://hooks.example.com/T/B/X");
        let config = Config::new(&args(&["--slack", "--chat-mode", "plain"]), &host).unwrap();
        assert_eq!(
            config.chat,
            ChatTarget::Enabled {
                webhook: Url::parse("https://hooks.example.com/T/B/X").unwrap(),
                delivery: ChatDelivery::Plain,
            }
        );
    }

    #[test]
    fn test_slack_digest_requires_api_key() {
        let host = host().with_var(WEBHOOK_URL_VAR, "https://hooks.example.com/T/B/X");
        let err = Config::new(&args(&["--slack"]), &host).unwrap_err();
        assert!(err.to_string().contains(MODEL_API_KEY_VAR));
    }

    #[test]
    fn test_slack_digest_model_defaults() {
        let host = host()
            .with_var(WEBHOOK_URL_VAR, "https://hooks.example.com/T/B/X")
            .with_var(MODEL_API_KEY_VAR, "sk-test");
        let config = Config::new(&args(&["--slack"]), &host).unwrap();

        let ChatTarget::Enabled {
            delivery: ChatDelivery::Digest(model),
            ..
        } = config.chat
        else {
            panic!("expected digest delivery, got {:?}", config.chat);
        };
        assert_eq!(model.api_key, "sk-test");
        assert_eq!(model.model, DEFAULT_MODEL);
        assert_eq!(model.url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_slack_digest_model_from_env() {
        let host = host()
            .with_var(WEBHOOK_URL_VAR, "https://hooks.example.com/T/B/X")
            .with_var(MODEL_API_KEY_VAR, "sk-test")
            .with_var(MODEL_NAME_VAR, "gpt-4.1");
        let config = Config::new(&args(&["--slack"]), &host).unwrap();
        assert!(matches!(config.chat, ChatTarget::Enabled { delivery: ChatDelivery::Digest(ref m), .. } if m.model == "gpt-4.1"));
    }

    #[test]
    fn test_invalid_webhook_url() {
        let host = host().with_var(WEBHOOK_URL_VAR, "not a url");
        assert!(Config::new(&args(&["--slack", "--chat-mode", "plain"]), &host).is_err());
    }

    #[test]
    fn test_model_credentials_not_needed_without_webhook() {
        let config = Config::new(&args(&["--slack"]), &host()).unwrap();
        assert_eq!(config.chat, ChatTarget::MissingWebhook);
    }
}
