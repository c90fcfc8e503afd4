use serde::{Deserialize, Serialize};

/// Summary written next to the subscriber log after every subscription.
/// It is always rebuilt from the log, never edited in place.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_subscribers: usize,
    pub last_updated: String,
    pub public_url: String,
}

impl StatsSnapshot {
    pub fn new(total_subscribers: usize, last_updated: &str, public_url: &str) -> Self {
        Self {
            total_subscribers,
            last_updated: last_updated.to_string(),
            public_url: public_url.to_string(),
        }
    }

    /// Two-space indented JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
