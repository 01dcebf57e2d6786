//! The end-to-end report: search, print, write Markdown, post to chat.

use super::Host;
use super::config::{ChatDelivery, ChatTarget, Config, WEBHOOK_URL_VAR};
use crate::Result;
use crate::digest::{Digest, Generator};
use crate::reports::{generate_chat_digest, generate_chat_plain, generate_console, generate_markdown};
use crate::search::{Client, RepositoryResult, SearchQuery};
use crate::webhook;
use chrono::{DateTime, Local};
use futures::TryStreamExt;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use tick::Clock;

const LOG_TARGET: &str = "    trends";

/// Run one report with `now` as the reference time
pub async fn report_trends<H: Host>(host: &mut H, config: &Config, now: DateTime<Local>) -> Result<()> {
    let query = SearchQuery::new(config.language.as_str(), config.days, config.date_field, now.date_naive());
    let client = Client::new(&config.github_token, config.search_url.clone())?.with_retry(config.retry, Clock::new_tokio());

    let items = client.search(&query, config.per_page).await?.items;
    let shown = &items[..items.len().min(config.top)];

    let mut console_output = String::new();
    generate_console(shown, config.top, config.use_colors, &mut console_output)?;
    let _ = write!(host.output(), "{console_output}");

    if let Some(path) = &config.markdown_out {
        let mut markdown = String::new();
        generate_markdown(shown, config.top, &config.title, now, &mut markdown)?;
        fs::write(path, markdown).into_app_err_with(|| format!("writing Markdown report to '{path}'"))?;
        let _ = writeln!(host.output(), "\nMarkdown report written to {path}");
    }

    match &config.chat {
        ChatTarget::Disabled => {}
        ChatTarget::MissingWebhook => {
            log::warn!(target: LOG_TARGET, "{WEBHOOK_URL_VAR} is not set, skipping the chat post");
            let _ = writeln!(host.error(), "WARN: {WEBHOOK_URL_VAR} is not set; skipped posting to chat");
        }
        ChatTarget::Enabled { webhook, delivery } => {
            let text = chat_text(config, shown, delivery).await?;
            let http = reqwest::Client::builder().user_agent("repo-trends").build()?;
            webhook::post(&http, webhook, &text).await?;
            let _ = writeln!(host.output(), "Posted to chat");
        }
    }

    Ok(())
}

async fn chat_text(config: &Config, shown: &[RepositoryResult], delivery: &ChatDelivery) -> Result<String> {
    let mut text = String::new();

    match delivery {
        ChatDelivery::Plain => generate_chat_plain(shown, config.top, &config.title, &mut text)?,
        ChatDelivery::Digest(model) => {
            let generator = Generator::new(&model.api_key, model.model.as_str(), model.url.clone())?;
            let digests: Vec<Digest> = generator.digests(shown).try_collect().await?;
            generate_chat_digest(shown, &digests, config.top, &config.title, &mut text)?;
        }
    }

    Ok(text)
}
