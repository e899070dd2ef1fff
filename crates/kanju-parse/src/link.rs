//! Input validation and player URL construction.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("no video URL given")]
    Empty,

    #[error("not a URL: {0}")]
    Malformed(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Trim user input and check it is an `http`/`https` URL.
pub fn validate(input: &str) -> Result<Url, LinkError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LinkError::Empty);
    }
    let url = Url::parse(input).map_err(|e| LinkError::Malformed(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LinkError::UnsupportedScheme(other.to_string())),
    }
}

pub fn is_valid_video_url(input: &str) -> bool {
    validate(input).is_ok()
}

/// Build the address of a parse line's player page for `video_url`.
///
/// The template is used verbatim as a prefix; the video URL is
/// percent-encoded so it survives as a single query value.
pub fn player_url(template: &str, video_url: &str) -> String {
    format!("{template}{}", urlencoding::encode(video_url))
}
