//! Retry middleware for HTTP calls that can be transiently refused.
//!
//! Wraps an operation in a [`seatbelt`] retry layer with exponential backoff. The
//! caller supplies the classifier that decides whether an attempt's output is worth
//! repeating; waiting between attempts runs on a [`tick::Clock`].

use core::time::Duration;
use layered::{Execute, Service, Stack};
use reqwest::StatusCode;
use seatbelt::retry::{Backoff, Retry};
use seatbelt::{RecoveryInfo, ResilienceContext};
use tick::Clock;

const LOG_TARGET: &str = "     retry";

/// Total attempts for a search request, including the first one.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; each later retry doubles it.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Upper bound for any single backoff delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(20);

/// Bounded exponential-backoff retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retry_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY)
    }
}

impl RetryPolicy {
    /// Create a policy allowing `max_attempts` attempts in total. Zero still performs one attempt.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retry_attempts: max_attempts.saturating_sub(1),
            base_delay,
            max_delay,
        }
    }

    /// Total attempts, including the first one
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retry_attempts + 1
    }

    /// Delay to wait after the failed attempt with the given zero-based index.
    #[must_use]
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        2_u32
            .checked_pow(attempt_index)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Run `operation` on `input` until `should_retry` rejects its output or the attempt budget is spent.
    ///
    /// When the budget runs out, the output of the last attempt is returned.
    pub async fn execute<In, Out, F, Fut, C>(
        &self,
        clock: &Clock,
        name: &'static str,
        input: In,
        should_retry: C,
        operation: F,
    ) -> Out
    where
        In: Clone + Send + Sync + 'static,
        Out: Send + 'static,
        Fut: Future<Output = Out> + Send,
        F: Fn(In) -> Fut + Send + Sync + Clone + 'static,
        C: Fn(&Out) -> bool + Send + Sync + 'static,
    {
        let context = ResilienceContext::new(clock).name(name);

        let service = (
            Retry::layer("retry", &context)
                .clone_input()
                .recovery_with(move |output: &Out, _| {
                    if should_retry(output) {
                        RecoveryInfo::retry()
                    } else {
                        RecoveryInfo::never()
                    }
                })
                .max_retry_attempts(self.max_retry_attempts)
                .base_delay(self.base_delay)
                .max_delay(self.max_delay)
                .backoff(Backoff::Exponential)
                .on_retry(move |_output, args| {
                    log::debug!(
                        target: LOG_TARGET,
                        "retrying {name} (attempt {}, delay {}ms)",
                        args.attempt().index() + 1,
                        args.retry_delay().as_millis(),
                    );
                }),
            Execute::new(move |input: In| {
                let f = operation.clone();
                async move { f(input).await }
            }),
        )
            .into_service();

        service.execute(input).await
    }
}

/// Whether a response signals rate limiting.
///
/// Only a 403 whose body mentions "rate limit" (in any case) counts. Other rate-limit
/// signals, such as dedicated headers, are deliberately not recognized.
#[must_use]
pub fn is_rate_limited(status: StatusCode, body: &str) -> bool {
    status == StatusCode::FORBIDDEN && body.to_lowercase().contains("rate limit")
}
