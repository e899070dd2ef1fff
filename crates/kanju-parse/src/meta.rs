use serde::{Deserialize, Serialize};
use url::Url;

use crate::{episode, title};

/// Title used when nothing sensible can be derived from the URL.
pub const DEFAULT_TITLE: &str = "视频播放";

/// Best-effort metadata guessed from a video page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMeta {
    /// Human-readable label; never empty.
    pub title: String,
    /// Formatted episode label (e.g., "第12集"), or empty.
    pub episode: String,
}

impl Default for VideoMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            episode: String::new(),
        }
    }
}

impl VideoMeta {
    pub fn has_episode(&self) -> bool {
        !self.episode.is_empty()
    }
}

/// Guess a title and episode from a video page URL.
///
/// Never fails: an unparsable URL yields [`VideoMeta::default`]. Scheme is
/// not checked here; see [`crate::link::validate`].
pub fn extract(url: &str) -> VideoMeta {
    let Ok(parsed) = Url::parse(url) else {
        tracing::debug!(url, "Unparsable URL, using default metadata");
        return VideoMeta::default();
    };

    let path = decode_path(parsed.path());
    let episode = episode::detect(&path, parsed.query()).unwrap_or_default();
    let title = title::from_path(&path).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    tracing::debug!(url, title = %title, episode = %episode, "Extracted video metadata");
    VideoMeta { title, episode }
}

/// Undo the percent-encoding `url` applies to non-ASCII path characters.
fn decode_path(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    }
}
