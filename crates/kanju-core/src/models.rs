use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One watch-history entry, keyed by its page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRecord {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub episode: String,
    #[serde(default)]
    pub note: String,
    #[serde(with = "iso_millis")]
    pub last_watch: DateTime<Utc>,
}

impl WatchRecord {
    pub fn new(url: &str, meta: &kanju_parse::VideoMeta, now: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            title: meta.title.clone(),
            episode: meta.episode.clone(),
            note: String::new(),
            last_watch: now,
        }
    }
}

/// `2024-05-01T12:30:00.000Z`, the shape `Date#toISOString` writes.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
