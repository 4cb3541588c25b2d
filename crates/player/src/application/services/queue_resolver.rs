//! Queue resolution against the remote catalog.
//!
//! Each dispatched intent gets its own spawned lookup tagged with a request
//! id. Lookups are never cancelled and never retried: a success is posted to
//! the control context, a failure is logged and dropped.

use std::sync::Arc;

use uuid::Uuid;
use waveline_domain::{PlaylistId, ResolvedQueue, VideoId, WatchEndpoint};

use crate::infrastructure::messaging::{ControlEvent, ControlSender};
use crate::ports::outbound::CatalogPort;

/// Spawns catalog lookups and reports their results on the control bus.
#[derive(Clone)]
pub struct QueueResolver {
    catalog: Arc<dyn CatalogPort>,
    control: ControlSender,
}

impl QueueResolver {
    pub fn new(catalog: Arc<dyn CatalogPort>, control: ControlSender) -> Self {
        Self { catalog, control }
    }

    /// Resolve a playback queue seeded at `video_id` within `playlist_id`.
    ///
    /// Delivers `ControlEvent::QueueResolved` on success.
    pub fn resolve_queue(
        &self,
        video_id: Option<VideoId>,
        playlist_id: Option<PlaylistId>,
    ) -> Uuid {
        let request_id = Uuid::new_v4();
        let catalog = Arc::clone(&self.catalog);
        let control = self.control.clone();

        tracing::debug!(
            %request_id,
            video_id = ?video_id,
            playlist_id = ?playlist_id,
            "Resolving queue"
        );

        tokio::spawn(async move {
            match catalog
                .resolve_queue(video_id.clone(), playlist_id.clone())
                .await
            {
                Ok(tracks) => {
                    let queue =
                        ResolvedQueue::from_catalog(WatchEndpoint::new(video_id, playlist_id), tracks);
                    tracing::debug!(%request_id, tracks = queue.len(), "Queue resolved");
                    control.deliver(ControlEvent::QueueResolved { request_id, queue });
                }
                Err(err) => {
                    tracing::warn!(%request_id, error = %err, "Queue resolution failed");
                }
            }
        });

        request_id
    }

    /// Look up the album an album-generated playlist belongs to.
    ///
    /// `target_generation` identifies the navigation target registered when
    /// the lookup was dispatched; the controller navigates only if that same
    /// target is still registered on delivery.
    pub fn resolve_album(&self, playlist_id: PlaylistId, target_generation: u64) -> Uuid {
        let request_id = Uuid::new_v4();
        let catalog = Arc::clone(&self.catalog);
        let control = self.control.clone();

        tracing::debug!(%request_id, %playlist_id, target_generation, "Resolving album");

        tokio::spawn(async move {
            match catalog.resolve_album_songs(playlist_id.clone()).await {
                Ok(songs) => {
                    let album_id = songs.first().and_then(|song| song.album_id()).cloned();
                    match album_id {
                        Some(album_id) => {
                            control.deliver(ControlEvent::AlbumResolved {
                                request_id,
                                target_generation,
                                album_id,
                            });
                        }
                        None => {
                            tracing::debug!(%request_id, %playlist_id, "Album playlist has no album");
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(%request_id, %playlist_id, error = %err, "Album resolution failed");
                }
            }
        });

        request_id
    }
}
