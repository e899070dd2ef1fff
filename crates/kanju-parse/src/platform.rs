use serde::{Deserialize, Serialize};

/// Embedded platform database.
const EMBEDDED_DB: &str = include_str!("../data/platforms.toml");

/// A video platform and the domains it serves pages from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDef {
    /// Display name (e.g., "Bilibili").
    pub name: String,
    /// Registrable domains; subdomains match too.
    pub domains: Vec<String>,
    /// Whether this platform counts as supported.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Wrapper for TOML deserialization.
#[derive(Debug, Deserialize)]
struct PlatformDbFile {
    #[serde(rename = "platform", default)]
    platforms: Vec<PlatformDef>,
}

/// Known video platforms, used to hint whether a parse line is likely to work.
#[derive(Debug, Clone)]
pub struct PlatformDatabase {
    platforms: Vec<PlatformDef>,
}

impl PlatformDatabase {
    /// Load the embedded platform database.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_DB).expect("embedded platforms.toml should be valid")
    }

    /// Load a platform database from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let db: PlatformDbFile = toml::from_str(toml_str)?;
        Ok(Self {
            platforms: db.platforms,
        })
    }

    /// Merge a user database into this one.
    /// Platforms with matching names are replaced; new platforms are appended.
    pub fn merge_user(&mut self, user_db: &PlatformDatabase) {
        for user_platform in &user_db.platforms {
            if let Some(pos) = self
                .platforms
                .iter()
                .position(|p| p.name == user_platform.name)
            {
                self.platforms[pos] = user_platform.clone();
            } else {
                self.platforms.push(user_platform.clone());
            }
        }
    }

    /// Name of the first enabled platform serving this URL, if any.
    pub fn match_url(&self, url: &str) -> Option<&str> {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        self.platforms
            .iter()
            .find(|p| p.enabled && p.domains.iter().any(|d| host_matches(&host, d)))
            .map(|p| p.name.as_str())
    }

    /// Whether any enabled platform serves this URL.
    pub fn is_supported(&self, url: &str) -> bool {
        self.match_url(url).is_some()
    }

    /// Number of platform definitions.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    /// Whether the database is empty.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(domain.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}
