//! Chat webhook delivery
//!
//! Posts a `{"text": ...}` payload, the format accepted by Slack incoming webhooks
//! and compatible services. A non-2xx response is an error.

use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use serde::Serialize;
use url::Url;

const LOG_TARGET: &str = "   webhook";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Serialize)]
struct Payload<'a> {
    text: &'a str,
}

/// Post `text` to the webhook at `url`
pub async fn post(client: &reqwest::Client, url: &Url, text: &str) -> Result<()> {
    log::info!(target: LOG_TARGET, "Posting {} byte(s) to the chat webhook", text.len());

    let resp = client
        .post(url.clone())
        .json(&Payload { text })
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .into_app_err("posting to the chat webhook")?;

    let status = resp.status();
    if !status.is_success() {
        bail!("chat webhook responded with HTTP {status}");
    }

    Ok(())
}
