use crate::adapters::atomic_file::{atomic_write, read_to_string_if_exists};
use crate::adapters::export_directory::ExportDirectory;
use crate::domain::{
    Confirmation, DuplicateMatch, StatsSnapshot, StoreError, SubscriberEmail, SubscriberLog,
    SubscriberRecord,
};
use anyhow::Context;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

pub const CONFIRMATION_MESSAGE: &str = "Successfully subscribed!";

pub enum WriterCommand {
    Subscribe {
        email: SubscriberEmail,
        reply: oneshot::Sender<Result<Confirmation, StoreError>>,
    },
}

/// Sole owner of the subscriber log and the stats file.
///
/// Commands are handled one at a time, so the read, duplicate check and
/// rewrite of a subscription never interleave with another one.
pub struct SubscriptionWriter {
    directory: ExportDirectory,
    duplicate_match: DuplicateMatch,
}

impl SubscriptionWriter {
    pub fn new(directory: ExportDirectory, duplicate_match: DuplicateMatch) -> Self {
        Self {
            directory,
            duplicate_match,
        }
    }

    pub async fn run(self, mut commands: mpsc::Receiver<WriterCommand>) {
        if let Err(error) = self.reconcile().await {
            tracing::error!(
                error.cause_chain = ?error,
                error.message = %error,
                "Failed to reconcile stats with the subscriber log"
            );
        }

        while let Some(command) = commands.recv().await {
            match command {
                WriterCommand::Subscribe { email, reply } => {
                    let outcome = self.append(email).await;
                    if let Err(StoreError::UnexpectedError(error)) = &outcome {
                        tracing::error!(
                            error.cause_chain = ?error,
                            error.message = %error,
                            "Failed to store subscriber"
                        );
                    }
                    // The caller may have gone away; the write stands either way.
                    let _ = reply.send(outcome);
                }
            }
        }

        tracing::info!("Subscription writer stopped");
    }

    #[tracing::instrument(
        name = "Appending subscriber to the log",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn append(&self, email: SubscriberEmail) -> Result<Confirmation, StoreError> {
        let log_path = self.directory.subscribers_path();
        let log = read_to_string_if_exists(&log_path)
            .await
            .context("Failed to read the subscriber log")?
            .map(SubscriberLog::new)
            .unwrap_or_else(SubscriberLog::empty);

        if log.contains(&email, self.duplicate_match) {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let record = SubscriberRecord::new(email, Utc::now());
        let total_subscribers = log.len() + 1;

        atomic_write(&log_path, log.appended(&record).as_bytes())
            .await
            .context("Failed to write the subscriber log")?;

        let data_url = self.directory.public_urls().subscribers_url;
        let stats = StatsSnapshot::new(total_subscribers, &record.timestamp(), &data_url);
        self.write_stats(&stats).await?;

        tracing::info!(total_subscribers, "Subscriber stored");

        Ok(Confirmation {
            message: CONFIRMATION_MESSAGE.to_string(),
            data_url,
        })
    }

    /// Rewrites the stats file when it disagrees with the log, which happens
    /// if the process stopped between the two writes of a subscription.
    #[tracing::instrument(name = "Reconciling stats with the subscriber log", skip(self))]
    async fn reconcile(&self) -> Result<(), anyhow::Error> {
        let log = match read_to_string_if_exists(&self.directory.subscribers_path())
            .await
            .context("Failed to read the subscriber log")?
        {
            Some(content) => SubscriberLog::new(content),
            None => return Ok(()),
        };

        let last_updated = match log.last_timestamp() {
            Some(timestamp) => timestamp.to_string(),
            None => return Ok(()),
        };

        let stored_total = read_to_string_if_exists(&self.directory.stats_path())
            .await
            .context("Failed to read the stats summary")?
            .and_then(|json| serde_json::from_str::<StatsSnapshot>(&json).ok())
            .map(|stats| stats.total_subscribers);

        if stored_total == Some(log.len()) {
            return Ok(());
        }

        tracing::warn!(
            stored_total = ?stored_total,
            log_total = log.len(),
            "Stats summary is stale, rebuilding it"
        );

        let data_url = self.directory.public_urls().subscribers_url;
        self.write_stats(&StatsSnapshot::new(log.len(), &last_updated, &data_url))
            .await
    }

    async fn write_stats(&self, stats: &StatsSnapshot) -> Result<(), anyhow::Error> {
        let json = stats
            .to_json()
            .context("Failed to serialise the stats summary")?;
        atomic_write(&self.directory.stats_path(), json.as_bytes())
            .await
            .context("Failed to write the stats summary")
    }
}
