//! Player controller: the single owner of session, routing and ducking state.
//!
//! The host drives it with lifecycle signals and incoming references, and
//! pumps [`PlayerController::step`] (or `try_step`) so results from background
//! work are applied on the host's own context. Nothing here is global; drop
//! the controller after `HostSignal::Destroy` and everything is gone.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use uuid::Uuid;
use waveline_domain::{AlbumId, Destination, NavigationTab, ResolvedQueue, RouteIntent};

use super::services::deep_link_router::{DeepLinkRouter, IncomingReference};
use super::services::pending_route_buffer::PendingRouteBuffer;
use super::services::queue_resolver::QueueResolver;
use super::services::shortcuts;
use super::services::voice_search::VoiceEpisode;
use super::services::volume_duck::VolumeDuckController;
use crate::config::PlayerConfig;
use crate::infrastructure::messaging::{
    control_channel, ControlEvent, SessionState, SessionStateObserver,
};
use crate::infrastructure::session::{
    SessionConnection, SessionError, TeardownPolicy, WeakSessionHandle,
};
use crate::ports::outbound::{CatalogPort, EngineBinder, NavigationPort, PreferencesPort};

/// Host lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// Host became visible.
    Start,
    /// Host went to the background.
    Stop,
    /// Host is being destroyed; `finishing` is false for recreation
    /// (rotation and the like).
    Destroy { finishing: bool },
}

struct NavigationTarget {
    generation: u64,
    port: Arc<dyn NavigationPort>,
}

pub struct PlayerController {
    session: SessionConnection,
    router: DeepLinkRouter,
    resolver: QueueResolver,
    pending: PendingRouteBuffer,
    duck: VolumeDuckController,
    preferences: Arc<dyn PreferencesPort>,
    navigation: Option<NavigationTarget>,
    target_generation: u64,
    events: mpsc::UnboundedReceiver<ControlEvent>,
}

impl PlayerController {
    pub fn new(
        config: &PlayerConfig,
        catalog: Arc<dyn CatalogPort>,
        binder: Arc<dyn EngineBinder>,
        preferences: Arc<dyn PreferencesPort>,
    ) -> Self {
        let (control, events) = control_channel();
        let session = SessionConnection::new(binder, control.clone(), config.reconnect);
        let duck = VolumeDuckController::new(session.subscribe(), config.duck_gain);

        Self {
            router: DeepLinkRouter::new(config.album_playlist_prefix.clone()),
            resolver: QueueResolver::new(catalog, control),
            pending: PendingRouteBuffer::new(),
            duck,
            session,
            preferences,
            navigation: None,
            target_generation: 0,
            events,
        }
    }

    // =========================================================================
    // Host lifecycle
    // =========================================================================

    pub fn on_host_signal(&mut self, signal: HostSignal) {
        tracing::debug!(signal = ?signal, state = %self.session.state(), "Host signal");
        match signal {
            HostSignal::Start => {
                self.session.connect();
            }
            HostSignal::Stop => self.session.disconnect(),
            HostSignal::Destroy { finishing } => {
                let policy = TeardownPolicy {
                    stop_on_task_clear: self.preferences.stop_engine_on_task_clear(),
                };
                self.session.teardown(finishing, policy);
            }
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session_observer(&self) -> SessionStateObserver {
        self.session.observer()
    }

    /// Live session handle broadcast, for observers such as a now-playing view.
    pub fn subscribe_session(&self) -> watch::Receiver<Option<WeakSessionHandle>> {
        self.session.subscribe()
    }

    pub fn volume_duck(&self) -> &VolumeDuckController {
        &self.duck
    }

    /// Tab to open on launch for the given shortcut action.
    pub fn initial_tab(&self, action: Option<&str>) -> NavigationTab {
        shortcuts::initial_tab(action, self.preferences.as_ref())
    }

    // =========================================================================
    // Navigation target
    // =========================================================================

    /// Register the host's navigation surface. Replays a buffered route, if
    /// any. Returns the target generation to pass to `release_navigation`.
    pub fn register_navigation(&mut self, port: Arc<dyn NavigationPort>) -> u64 {
        self.target_generation += 1;
        let generation = self.target_generation;
        self.navigation = Some(NavigationTarget { generation, port });
        tracing::debug!(navigation_target = generation, "Navigation target registered");

        if let Some(intent) = self.pending.on_target_ready(generation) {
            self.dispatch(intent);
        }
        generation
    }

    /// Signal readiness again for the registered target. Never replays
    /// anything twice; signals for any other target are ignored.
    pub fn navigation_ready(&mut self, generation: u64) {
        let current = self.navigation.as_ref().map(|target| target.generation);
        if current != Some(generation) {
            tracing::debug!(
                navigation_target = generation,
                current = ?current,
                "Ready signal for unregistered target ignored"
            );
            return;
        }
        if let Some(intent) = self.pending.on_target_ready(generation) {
            self.dispatch(intent);
        }
    }

    pub fn release_navigation(&mut self, generation: u64) {
        if self
            .navigation
            .as_ref()
            .is_some_and(|target| target.generation == generation)
        {
            self.navigation = None;
            tracing::debug!(navigation_target = generation, "Navigation target released");
        }
        self.pending.on_target_released(generation);
    }

    // =========================================================================
    // Incoming references
    // =========================================================================

    /// Route an incoming reference. The field it is read from is cleared, so
    /// offering the same reference again does nothing.
    pub fn offer_reference(&mut self, reference: &mut IncomingReference) {
        let Some(intent) = self.router.route(reference) else {
            return;
        };
        if let Some(intent) = self.pending.offer(intent) {
            self.dispatch(intent);
        }
    }

    fn dispatch(&self, intent: RouteIntent) {
        if let Some(destination) = intent.destination() {
            self.navigate(destination);
            return;
        }
        match intent {
            RouteIntent::PlayResolved {
                video_id,
                playlist_id,
            } => {
                self.resolver.resolve_queue(video_id, playlist_id);
            }
            RouteIntent::ResolveAlbum { playlist_id } => match &self.navigation {
                Some(target) => {
                    self.resolver.resolve_album(playlist_id, target.generation);
                }
                None => {
                    tracing::debug!(%playlist_id, "No navigation target, album lookup skipped");
                }
            },
            other => {
                tracing::warn!(intent = ?other, "Intent has neither destination nor lookup");
            }
        }
    }

    fn navigate(&self, destination: Destination) {
        let Some(target) = &self.navigation else {
            tracing::debug!(destination = %destination, "No navigation target, dropping");
            return;
        };
        let token = destination.token();
        if let Err(err) = target.port.navigate(destination) {
            tracing::warn!(destination = %token, error = %err, "Navigation failed");
        }
    }

    // =========================================================================
    // Voice search
    // =========================================================================

    /// Start a voice interaction; the volume stays ducked until the episode
    /// is finished or dropped.
    pub fn begin_voice_search(&self) -> VoiceEpisode {
        self.duck.begin_voice_episode()
    }

    /// Finish a voice interaction and open a search for its transcript.
    pub fn complete_voice_search(&self, episode: VoiceEpisode, transcript: Option<&str>) {
        if let Some(destination) = episode.finish(transcript) {
            self.navigate(destination);
        }
    }

    // =========================================================================
    // Control events
    // =========================================================================

    /// Wait for the next control event and apply it.
    pub async fn step(&mut self) {
        // The controller holds a sender, so the channel never closes.
        if let Some(event) = self.events.recv().await {
            self.process(event);
        }
    }

    /// Apply one pending control event without waiting. Returns whether one
    /// was applied.
    pub fn try_step(&mut self) -> bool {
        match self.events.try_recv() {
            Ok(event) => {
                self.process(event);
                true
            }
            Err(_) => false,
        }
    }

    fn process(&mut self, event: ControlEvent) {
        tracing::trace!(event = ?event, "Applying control event");
        match event {
            ControlEvent::EngineBound { generation, result } => {
                self.session.on_bound(generation, result);
                if self.session.state() == SessionState::Connected {
                    self.duck.sync_to_session();
                }
            }
            ControlEvent::EngineLost { generation } => self.session.on_engine_lost(generation),
            ControlEvent::QueueResolved { request_id, queue } => {
                self.play_resolved(request_id, queue)
            }
            ControlEvent::AlbumResolved {
                request_id,
                target_generation,
                album_id,
            } => self.open_resolved_album(request_id, target_generation, album_id),
        }
    }

    fn play_resolved(&self, request_id: Uuid, queue: ResolvedQueue) {
        let Some(handle) = self.session.current_handle() else {
            tracing::debug!(%request_id, "Not connected, dropping resolved queue");
            return;
        };
        match handle.play_queue(queue) {
            Ok(()) => tracing::info!(
                %request_id,
                generation = handle.generation(),
                "Playing resolved queue"
            ),
            Err(SessionError::NotConnected) => {
                tracing::debug!(%request_id, "Session went away, dropping resolved queue")
            }
            Err(err) => tracing::warn!(%request_id, error = %err, "Engine rejected queue"),
        }
    }

    fn open_resolved_album(&self, request_id: Uuid, target_generation: u64, album_id: AlbumId) {
        let current = self.navigation.as_ref().map(|target| target.generation);
        if current != Some(target_generation) {
            tracing::debug!(
                %request_id,
                target_generation,
                current = ?current,
                "Navigation target changed, dropping album"
            );
            return;
        }
        self.navigate(Destination::Album(album_id));
    }
}
