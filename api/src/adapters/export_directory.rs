use crate::domain::{ArtifactName, ArtifactToken, PublicUrls};
use std::path::{Path, PathBuf};

/// Where the subscriber log and the stats summary live on disk.
#[derive(Debug, Clone)]
pub struct ExportDirectory {
    base_path: PathBuf,
    token: ArtifactToken,
}

impl ExportDirectory {
    pub fn new(base_path: PathBuf, token: ArtifactToken) -> Self {
        Self { base_path, token }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn subscribers_path(&self) -> PathBuf {
        self.base_path.join(self.token.subscribers_file_name())
    }

    pub fn stats_path(&self) -> PathBuf {
        self.base_path.join(self.token.stats_file_name())
    }

    pub fn public_urls(&self) -> PublicUrls {
        self.token.public_urls()
    }

    /// Path of one of the two exported files, or `None` when `name` is well
    /// formed but not something this service writes.
    pub fn path_for(&self, name: &ArtifactName) -> Option<PathBuf> {
        let file_name = name.file_name();
        if file_name == self.token.subscribers_file_name() || file_name == self.token.stats_file_name() {
            Some(self.base_path.join(file_name))
        } else {
            None
        }
    }
}
