//! Error types for every stage of the digest pipeline.
//!
//! The taxonomy follows how far each failure is allowed to travel:
//!
//! - [`ConfigError`]: invalid configuration, reported before any network I/O.
//! - [`PipelineError`]: the listing could not be fetched or yielded no links.
//!   Aborts the run.
//! - [`ArticleError`]: anything that goes wrong for a single article. The
//!   pipeline driver logs it and moves on to the next link.
//! - [`LlmError`]: a single failed model call. Retried in place by
//!   [`RetryAsk`](crate::api::RetryAsk) before surfacing as a
//!   [`SummarizeError`].

use thiserror::Error;

/// Failure while fetching a page over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// A single failed call to the language-model endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode model response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model returned no completion text")]
    EmptyResponse,
}

/// The model call failed on every attempt.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarization failed after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: usize,
        #[source]
        source: LlmError,
    },
}

/// Recoverable failure for one article.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Unrecoverable failure for the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch listing page: {0}")]
    Listing(#[source] FetchError),

    #[error("no links found on {url}")]
    NoLinks { url: String },

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid CSS selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("API key is missing or invalid: {0}")]
    ApiKey(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_url_and_code() {
        let err = FetchError::Status {
            url: "https://example.com/a".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "https://example.com/a responded with HTTP 503");
    }

    #[test]
    fn test_article_error_is_transparent() {
        let err: ArticleError = FetchError::Status {
            url: "https://example.com/a".to_string(),
            status: 404,
        }
        .into();
        assert_eq!(err.to_string(), "https://example.com/a responded with HTTP 404");
    }

    #[test]
    fn test_exhausted_reports_attempts() {
        let err = SummarizeError::Exhausted {
            attempts: 3,
            source: LlmError::EmptyResponse,
        };
        assert_eq!(
            err.to_string(),
            "summarization failed after 3 attempt(s): model returned no completion text"
        );
    }
}
