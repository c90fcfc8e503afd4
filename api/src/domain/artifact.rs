use serde::Serialize;
use sha2::{Digest, Sha256};

pub const TOKEN_LENGTH: usize = 16;
pub const CACHE_MAX_AGE_SECONDS: u32 = 60;

const PUBLIC_PREFIX: &str = "/data-exports";

/// Namespace token embedded in both exported file names.
///
/// It is not a secret: it only keeps the export paths from being guessable.
/// Derived once at startup from a seed and handed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactToken(String);

impl ArtifactToken {
    /// First sixteen hex digits of the SHA-256 of `seed`.
    pub fn derive(seed: &str) -> Self {
        let digest = hex::encode(Sha256::digest(seed.as_bytes()));
        Self(digest[..TOKEN_LENGTH].to_string())
    }

    pub fn parse(s: String) -> Result<ArtifactToken, String> {
        if is_token(&s) {
            Ok(Self(s))
        } else {
            Err(format!(
                "{} is not a valid artifact token. Expected {} lowercase hex characters",
                s, TOKEN_LENGTH
            ))
        }
    }

    pub fn subscribers_file_name(&self) -> String {
        format!("subscribers-{}.txt", self.0)
    }

    pub fn stats_file_name(&self) -> String {
        format!("stats-{}.json", self.0)
    }

    pub fn public_urls(&self) -> PublicUrls {
        PublicUrls {
            subscribers_url: format!("{}/{}", PUBLIC_PREFIX, self.subscribers_file_name()),
            stats_url: format!("{}/{}", PUBLIC_PREFIX, self.stats_file_name()),
        }
    }
}

impl AsRef<str> for ArtifactToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_token(s: &str) -> bool {
    s.len() == TOKEN_LENGTH && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUrls {
    pub subscribers_url: String,
    pub stats_url: String,
}

/// A requested export file name of the form
/// `(subscribers|stats)-<16 hex>.(txt|json)`.
///
/// Any token is accepted here. Whether the name points at one of the
/// two files this service writes is decided by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    file_name: String,
    content_type: &'static str,
}

impl ArtifactName {
    pub fn parse(s: &str) -> Result<ArtifactName, String> {
        let rest = s
            .strip_prefix("subscribers-")
            .or_else(|| s.strip_prefix("stats-"));

        let content_type = rest.and_then(|rest| {
            let token = rest.get(..TOKEN_LENGTH)?;
            let extension = rest.get(TOKEN_LENGTH..)?;
            if !is_token(token) {
                return None;
            }
            match extension {
                ".txt" => Some("text/plain"),
                ".json" => Some("application/json"),
                _ => None,
            }
        });

        match content_type {
            Some(content_type) => Ok(Self {
                file_name: s.to_string(),
                content_type,
            }),
            None => Err(format!("{} is not a valid export file name", s)),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// Raw bytes of an exported file, ready to be served.
#[derive(Debug)]
pub struct Artifact {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub max_age_seconds: u32,
}

impl Artifact {
    pub fn new(body: Vec<u8>, name: &ArtifactName) -> Self {
        Self {
            body,
            content_type: name.content_type(),
            max_age_seconds: CACHE_MAX_AGE_SECONDS,
        }
    }

    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, s-maxage={}",
            self.max_age_seconds, self.max_age_seconds
        )
    }
}
