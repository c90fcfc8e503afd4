pub mod artifact;
pub mod stats_snapshot;
pub mod subscriber_email;
pub mod subscriber_log;
pub mod subscriber_record;
pub mod subscriber_store;

pub use crate::domain::artifact::{Artifact, ArtifactName, ArtifactToken, PublicUrls};
pub use crate::domain::stats_snapshot::StatsSnapshot;
pub use crate::domain::subscriber_email::SubscriberEmail;
pub use crate::domain::subscriber_log::{DuplicateMatch, SubscriberLog};
pub use crate::domain::subscriber_record::SubscriberRecord;
pub use crate::domain::subscriber_store::{
    ArtifactError, Confirmation, StorageStatus, StoreError, SubscriberStore,
};
