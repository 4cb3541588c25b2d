//! Catalog Port - remote metadata lookups used to resolve deep links
//!
//! The catalog is an opaque asynchronous service. Calls are single-shot from
//! this crate's point of view; any retry/backoff is the adapter's business.

use async_trait::async_trait;
use thiserror::Error;
use waveline_domain::{PlaylistId, TrackMetadata, VideoId};

/// Errors reported by a catalog lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Network(String),
    #[error("Catalog entry not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Port for catalog queue and album lookups
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Resolve a playback queue seeded at `video_id` within `playlist_id`.
    ///
    /// At least one of the two is present.
    async fn resolve_queue(
        &self,
        video_id: Option<VideoId>,
        playlist_id: Option<PlaylistId>,
    ) -> Result<Vec<TrackMetadata>, CatalogError>;

    /// Resolve the songs of an album-generated playlist.
    async fn resolve_album_songs(
        &self,
        playlist_id: PlaylistId,
    ) -> Result<Vec<TrackMetadata>, CatalogError>;
}
