use crate::domain::subscriber_email::SubscriberEmail;
use chrono::{DateTime, SecondsFormat, Utc};

const FIELD_SEPARATOR: &str = " | ";

/// One line of the subscriber log: `email | 2024-05-01T10:20:30.123Z`.
pub struct SubscriberRecord {
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
}

impl SubscriberRecord {
    pub fn new(email: SubscriberEmail, subscribed_at: DateTime<Utc>) -> Self {
        Self {
            email,
            subscribed_at,
        }
    }

    pub fn timestamp(&self) -> String {
        self.subscribed_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn to_line(&self) -> String {
        format!("{}{}{}\n", self.email, FIELD_SEPARATOR, self.timestamp())
    }
}

/// Splits a stored line into its email and timestamp columns.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    line.trim_end_matches(['\r', '\n'])
        .split_once(FIELD_SEPARATOR)
}
