use crate::adapters::atomic_file::is_temp_file;
use crate::adapters::export_directory::ExportDirectory;
use crate::adapters::subscription_writer::{SubscriptionWriter, WriterCommand};
use crate::domain::{
    Artifact, ArtifactError, ArtifactName, Confirmation, DuplicateMatch, PublicUrls,
    StorageStatus, StoreError, SubscriberEmail, SubscriberStore,
};
use anyhow::Context;
use async_trait::async_trait;
use std::io;
use tokio::fs;
use tokio::sync::{mpsc, oneshot};

/// Subscriber store backed by two files in the export directory.
///
/// Writes are forwarded to a [`SubscriptionWriter`] task; reads go straight
/// to disk. Both files are replaced atomically, so a read never observes a
/// partial write.
#[derive(Clone)]
pub struct FileSubscriberStore {
    directory: ExportDirectory,
    commands: mpsc::Sender<WriterCommand>,
}

impl FileSubscriberStore {
    /// Starts the writer task on the current tokio runtime.
    pub fn spawn(
        directory: ExportDirectory,
        duplicate_match: DuplicateMatch,
        queue_capacity: usize,
    ) -> Self {
        let (commands, receiver) = mpsc::channel(queue_capacity.max(1));
        let writer = SubscriptionWriter::new(directory.clone(), duplicate_match);
        tokio::spawn(writer.run(receiver));

        Self {
            directory,
            commands,
        }
    }
}

#[async_trait]
impl SubscriberStore for FileSubscriberStore {
    #[tracing::instrument(
        name = "Queueing subscription",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn subscribe(&self, email: SubscriberEmail) -> Result<Confirmation, StoreError> {
        let (reply, outcome) = oneshot::channel();

        self.commands
            .send(WriterCommand::Subscribe { email, reply })
            .await
            .map_err(|_| anyhow::anyhow!("The subscription writer is no longer running"))?;

        outcome
            .await
            .context("The subscription writer dropped the request")?
    }

    fn public_urls(&self) -> PublicUrls {
        self.directory.public_urls()
    }

    #[tracing::instrument(name = "Reading export file", skip(self))]
    async fn read_artifact(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let name = ArtifactName::parse(name).map_err(ArtifactError::InvalidName)?;
        let path = self
            .directory
            .path_for(&name)
            .ok_or_else(|| ArtifactError::NotFound(name.file_name().to_string()))?;

        match fs::read(&path).await {
            Ok(body) => Ok(Artifact::new(body, &name)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ArtifactError::NotFound(name.file_name().to_string()))
            }
            Err(e) => Err(ArtifactError::UnexpectedError(
                anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
            )),
        }
    }

    #[tracing::instrument(name = "Listing export directory", skip(self))]
    async fn storage_status(&self) -> Result<StorageStatus, anyhow::Error> {
        let base_path = self.directory.base_path();
        let path = base_path.display().to_string();

        let mut entries = match fs::read_dir(base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(StorageStatus {
                    directory_exists: false,
                    path,
                    files: Vec::new(),
                    files_count: 0,
                })
            }
            Err(e) => return Err(e).context(format!("Failed to list {}", path)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read a directory entry")?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_temp_file(&name) {
                files.push(name);
            }
        }
        files.sort();

        Ok(StorageStatus {
            directory_exists: true,
            path,
            files_count: files.len(),
            files,
        })
    }
}
