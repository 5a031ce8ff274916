//! Directory-backed artifact store

use super::{ArtifactMetadata, ArtifactSelector, ArtifactStore, StoredArtifact};
use crate::error::{SearchError, SearchResult};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const INDEX_FILE: &str = "index.json";

/// One `.py` file per artifact plus a JSON index in the same directory
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    /// Store rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Index entries in save order
    async fn read_index(&self) -> SearchResult<Vec<ArtifactMetadata>> {
        match tokio::fs::read_to_string(self.index_path()).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_index(&self, entries: &[ArtifactMetadata]) -> SearchResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(self.index_path(), json).await?;
        Ok(())
    }
}

fn slug(label: &str) -> String {
    let slug: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "artifact".to_string()
    } else {
        slug.to_string()
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn save(
        &self,
        source: &str,
        label: &str,
        fitness: f64,
    ) -> SearchResult<ArtifactMetadata> {
        tokio::fs::create_dir_all(&self.root).await?;

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let file_name = format!(
            "{}-{}-{}.py",
            slug(label),
            created_at.format("%Y%m%d%H%M%S"),
            &id.simple().to_string()[..8]
        );
        let location = self.root.join(file_name);
        tokio::fs::write(&location, source).await?;

        let metadata = ArtifactMetadata {
            id,
            label: label.to_string(),
            fitness,
            created_at,
            location,
        };

        let mut entries = self.read_index().await?;
        entries.push(metadata.clone());
        self.write_index(&entries).await?;

        tracing::info!(
            "Saved artifact '{}' ({:.2}) to {}",
            label,
            fitness,
            metadata.location.display()
        );
        Ok(metadata)
    }

    async fn list(&self) -> SearchResult<Vec<ArtifactMetadata>> {
        let mut entries = self.read_index().await?;
        entries.reverse();
        Ok(entries)
    }

    async fn load(&self, selector: &ArtifactSelector) -> SearchResult<StoredArtifact> {
        let entries = self.list().await?;
        let found = match selector {
            ArtifactSelector::Latest => entries.into_iter().next(),
            ArtifactSelector::Index(index) => entries.into_iter().nth(*index),
            ArtifactSelector::Id(id) => entries.into_iter().find(|e| e.id == *id),
            ArtifactSelector::Label(label) => entries.into_iter().find(|e| e.label == *label),
        };
        let metadata = found.ok_or_else(|| SearchError::ArtifactNotFound {
            selector: selector.to_string(),
        })?;

        let source = tokio::fs::read_to_string(&metadata.location).await?;
        Ok(StoredArtifact { metadata, source })
    }
}
