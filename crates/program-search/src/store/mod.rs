//! Persistence of search results between runs

mod file;


pub use file::FileArtifactStore;

use crate::error::SearchResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Index entry of a stored artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Unique identifier
    pub id: Uuid,
    /// Caller-supplied label
    pub label: String,
    /// Fitness at save time
    pub fitness: f64,
    /// Save time
    pub created_at: DateTime<Utc>,
    /// Where the source was written
    pub location: PathBuf,
}

/// A stored artifact with its source
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    /// Index entry
    pub metadata: ArtifactMetadata,
    /// Source text
    pub source: String,
}

/// Which artifact to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSelector {
    /// Most recently saved
    Latest,
    /// Position in [`ArtifactStore::list`] order, newest first
    Index(usize),
    /// Exact identifier
    Id(Uuid),
    /// Most recent artifact with this label
    Label(String),
}

impl FromStr for ArtifactSelector {
    type Err = std::convert::Infallible;

    /// `latest`, a list index, a UUID, or otherwise a label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        if let Ok(index) = s.parse::<usize>() {
            return Ok(Self::Index(index));
        }
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(Self::Id(id));
        }
        Ok(Self::Label(s.to_string()))
    }
}

impl fmt::Display for ArtifactSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Index(index) => write!(f, "#{}", index),
            Self::Id(id) => write!(f, "{}", id),
            Self::Label(label) => write!(f, "label '{}'", label),
        }
    }
}

/// Sink and source of result programs
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist `source` under `label`
    async fn save(&self, source: &str, label: &str, fitness: f64)
        -> SearchResult<ArtifactMetadata>;

    /// Every stored artifact, newest first
    async fn list(&self) -> SearchResult<Vec<ArtifactMetadata>>;

    /// Load one artifact
    async fn load(&self, selector: &ArtifactSelector) -> SearchResult<StoredArtifact>;
}
