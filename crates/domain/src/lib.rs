//! Waveline domain types.
//!
//! Catalog ids, the track/queue model handed to the playback engine, and the
//! route intents external references are parsed into. Pure data: no I/O and
//! no async runtime.

pub mod error;
pub mod ids;
pub mod route;
pub mod track;

pub use error::DomainError;
pub use ids::{AlbumId, ArtistId, PlaylistId, VideoId, ALBUM_PLAYLIST_PREFIX};
pub use route::{Destination, NavigationTab, RouteIntent};
pub use track::{AlbumRef, ArtistRef, ResolvedQueue, TrackMetadata, WatchEndpoint};
