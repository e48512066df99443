//! LLM interaction with bounded, linearly backed-off retries.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait for sending a prompt and getting a completion
//! - [`RetryAsk`]: decorator that retries any [`AskAsync`] implementation
//! - Concrete HTTP clients live in [`crate::providers`]
//!
//! # Retry Strategy
//!
//! - `max_attempts` calls in total (3 by default)
//! - after failed attempt `n` the delay is `n * backoff_step` (1.5 s, 3 s, ...)
//! - the last error is returned once the budget is spent

use crate::error::LlmError;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its completion. The
/// abstraction lets the summarizer run against real providers, decorators
/// like [`RetryAsk`], or scripted fakes in tests.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send `text` to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, LlmError>;
}

/// Wrapper that adds linear-backoff retries to any [`AskAsync`] implementation.
///
/// ```text
/// delay after attempt n = n * backoff_step
/// ```
pub struct RetryAsk<T> {
    inner: T,
    /// Total number of calls, including the first.
    max_attempts: usize,
    backoff_step: Duration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Wrap `inner`. A `max_attempts` of zero is treated as one.
    pub fn new(inner: T, max_attempts: usize, backoff_step: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            backoff_step,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Delay slept after the given failed attempt (1-based).
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        self.backoff_step.saturating_mul(attempt as u32)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_attempts", &self.max_attempts)
            .field("backoff_step", &self.backoff_step)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, LlmError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt >= self.max_attempts {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "ask() exhausted attempts"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff_for(attempt);
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
