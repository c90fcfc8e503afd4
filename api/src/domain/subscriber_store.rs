use crate::domain::artifact::{Artifact, PublicUrls};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::utils::error_chain_fmt;
use async_trait::async_trait;
use serde::Serialize;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("{0} is already subscribed")]
    DuplicateEmail(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum ArtifactError {
    #[error("{0}")]
    InvalidName(String),
    #[error("{0} has not been written")]
    NotFound(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: String,
    pub data_url: String,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub directory_exists: bool,
    pub path: String,
    pub files: Vec<String>,
    pub files_count: usize,
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Appends `email` to the log unless it is already there and rewrites
    /// the stats summary.
    async fn subscribe(&self, email: SubscriberEmail) -> Result<Confirmation, StoreError>;

    fn public_urls(&self) -> PublicUrls;

    async fn read_artifact(&self, name: &str) -> Result<Artifact, ArtifactError>;

    async fn storage_status(&self) -> Result<StorageStatus, anyhow::Error>;
}
