use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_record::{split_line, SubscriberRecord};
use serde::Deserialize;

/// How an incoming email is compared against the stored log.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMatch {
    /// The email is a duplicate if it occurs anywhere in the raw log text.
    /// `ann@example.com` is therefore rejected once `joann@example.com` is
    /// stored.
    #[default]
    Substring,
    /// The email is a duplicate only if a line's email column equals it.
    Exact,
}

/// The full text of the subscriber log as read from disk.
pub struct SubscriberLog(String);

impl SubscriberLog {
    pub fn new(content: String) -> Self {
        Self(content)
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn contains(&self, email: &SubscriberEmail, mode: DuplicateMatch) -> bool {
        match mode {
            DuplicateMatch::Substring => self.0.contains(email.as_ref()),
            DuplicateMatch::Exact => self
                .lines()
                .filter_map(split_line)
                .any(|(stored, _)| stored == email.as_ref()),
        }
    }

    /// Number of non-blank lines.
    pub fn len(&self) -> usize {
        self.lines().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timestamp column of the last stored record.
    pub fn last_timestamp(&self) -> Option<&str> {
        self.lines()
            .filter_map(split_line)
            .last()
            .map(|(_, timestamp)| timestamp)
    }

    pub fn appended(&self, record: &SubscriberRecord) -> String {
        let mut content = String::with_capacity(self.0.len() + 64);
        content.push_str(&self.0);
        content.push_str(&record.to_line());
        content
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines().filter(|line| !line.trim().is_empty())
    }
}
