use crate::error::ScrapeError;
use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

/// Raw response body plus whatever charset the server declared, before any
/// decoding. Created once per run and discarded after decode.
#[derive(Debug)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    /// `charset` parameter of the response `Content-Type`, if present.
    pub declared_charset: Option<String>,
}

/// Fetch the document at `url` and return its raw bytes. One blocking
/// request, no retry; any transport or HTTP-status failure is fatal.
pub fn fetch_document(client: &Client, url: &str) -> Result<RawDocument, ScrapeError> {
    let parsed = Url::parse(url).map_err(|source| ScrapeError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    info!(url = %parsed, "fetching document");

    let resp = client
        .get(parsed)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        })?;

    let declared_charset = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| {
            ct.split(';')
                .map(str::trim)
                .find_map(|p| p.strip_prefix("charset="))
                .map(|c| c.trim_matches('"').to_string())
        });

    let bytes = resp
        .bytes()
        .map_err(|source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        })?
        .to_vec();

    debug!(
        len = bytes.len(),
        charset = declared_charset.as_deref().unwrap_or("<none>"),
        "fetched body"
    );
    Ok(RawDocument {
        bytes,
        declared_charset,
    })
}
