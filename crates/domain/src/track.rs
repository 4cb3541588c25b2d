//! Track metadata and resolved playback queues.

use serde::{Deserialize, Serialize};

use crate::ids::{AlbumId, ArtistId, PlaylistId, VideoId};

/// Artist credit on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
    pub id: Option<ArtistId>,
}

/// Album a track belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: AlbumId,
    pub title: String,
}

/// Metadata for a single playable track as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: VideoId,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    pub duration_secs: Option<u32>,
    pub thumbnail_url: Option<String>,
}

impl TrackMetadata {
    pub fn new(id: VideoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artists: Vec::new(),
            album: None,
            duration_secs: None,
            thumbnail_url: None,
        }
    }

    pub fn with_album(mut self, album: AlbumRef) -> Self {
        self.album = Some(album);
        self
    }

    pub fn with_artist(mut self, artist: ArtistRef) -> Self {
        self.artists.push(artist);
        self
    }

    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Id of the album this track belongs to, if the catalog reported one.
    pub fn album_id(&self) -> Option<&AlbumId> {
        self.album.as_ref().map(|album| &album.id)
    }
}

/// Endpoint the engine uses to fetch continuations for a queue.
///
/// Carries the seed video and/or the playlist context it was started from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEndpoint {
    pub video_id: Option<VideoId>,
    pub playlist_id: Option<PlaylistId>,
}

impl WatchEndpoint {
    pub fn new(video_id: Option<VideoId>, playlist_id: Option<PlaylistId>) -> Self {
        Self {
            video_id,
            playlist_id,
        }
    }
}

/// An ordered queue ready to be handed to the playback engine.
///
/// Owned by whoever requested the resolution and moved into the engine; it is
/// never shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQueue {
    pub endpoint: WatchEndpoint,
    pub tracks: Vec<TrackMetadata>,
    /// Metadata shown as the current track while the engine loads the queue.
    pub current: Option<TrackMetadata>,
}

impl ResolvedQueue {
    /// Build a queue from a catalog response; the first track becomes current.
    pub fn from_catalog(endpoint: WatchEndpoint, tracks: Vec<TrackMetadata>) -> Self {
        let current = tracks.first().cloned();
        Self {
            endpoint,
            tracks,
            current,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
