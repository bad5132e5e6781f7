use thiserror::Error;

/// Document-level failures. Per-item problems during structural extraction
/// are collected as diagnostics instead and never surface here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or HTTP failure. Fatal to the run, no retry.
    #[error("transport failure fetching {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The caller handed us something that does not parse as a URL.
    #[error("invalid url `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The document contains no embedded inventory table. Distinct from a
    /// crash; the caller decides whether to abort gracefully.
    #[error("no embedded inventory table found in document")]
    TableNotFound,

    /// The opening marker was present but the literal never closes.
    #[error("embedded inventory literal is missing its closing delimiter")]
    UnterminatedLiteral,
}
