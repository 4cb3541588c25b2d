//! Route intents parsed from external references, and the navigation
//! destinations they lead to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::DomainError;
use crate::ids::{AlbumId, ArtistId, PlaylistId, VideoId};

/// Actionable representation of an external reference.
///
/// Constructed once per incoming reference and moved into dispatch; never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteIntent {
    OpenAlbum { album_id: AlbumId },
    OpenArtist { artist_id: ArtistId },
    OpenSearch { query: String },
    OpenPlaylist { playlist_id: PlaylistId },
    /// Play a queue resolved from the catalog, seeded at `video_id` when present.
    PlayResolved {
        video_id: Option<VideoId>,
        playlist_id: Option<PlaylistId>,
    },
    /// Album-generated playlist: look up the owning album, then open it.
    ResolveAlbum { playlist_id: PlaylistId },
}

impl RouteIntent {
    /// Destination for intents that navigate without a catalog lookup.
    pub fn destination(&self) -> Option<Destination> {
        match self {
            Self::OpenAlbum { album_id } => Some(Destination::Album(album_id.clone())),
            Self::OpenArtist { artist_id } => Some(Destination::Artist(artist_id.clone())),
            Self::OpenSearch { query } => Some(Destination::Search(query.clone())),
            Self::OpenPlaylist { playlist_id } => {
                Some(Destination::OnlinePlaylist(playlist_id.clone()))
            }
            Self::PlayResolved { .. } | Self::ResolveAlbum { .. } => None,
        }
    }

    /// Whether dispatching this intent requires a catalog lookup.
    pub fn needs_catalog(&self) -> bool {
        matches!(self, Self::PlayResolved { .. } | Self::ResolveAlbum { .. })
    }
}

/// A screen the navigation layer can open directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Destination {
    Album(AlbumId),
    Artist(ArtistId),
    OnlinePlaylist(PlaylistId),
    Search(String),
}

impl Destination {
    /// Navigation token understood by the host's navigation graph.
    ///
    /// Search queries are form-urlencoded, so `daft punk` becomes
    /// `search/daft+punk`.
    pub fn token(&self) -> String {
        match self {
            Self::Album(id) => format!("album/{id}"),
            Self::Artist(id) => format!("artist/{id}"),
            Self::OnlinePlaylist(id) => format!("online_playlist/{id}"),
            Self::Search(query) => {
                let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
                format!("search/{encoded}")
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Top-level tab the navigation layer opens on launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTab {
    #[default]
    Home,
    Search,
    Library,
}

impl NavigationTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Search => "search",
            Self::Library => "library",
        }
    }
}

impl FromStr for NavigationTab {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "search" => Ok(Self::Search),
            "library" => Ok(Self::Library),
            other => Err(DomainError::parse(format!("Unknown navigation tab: {other}"))),
        }
    }
}
