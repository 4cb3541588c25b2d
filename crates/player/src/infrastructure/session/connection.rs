//! Session connection: the state machine owning the engine binding.
//!
//! Driven entirely by plain signals: host lifecycle calls (`connect`,
//! `disconnect`, `teardown`) and control events posted by the background bind
//! task (`on_bound`, `on_engine_lost`). Must be used from within a Tokio
//! runtime; binds and unbinds run on spawned tasks.

use std::sync::atomic::AtomicU8;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::handle::{SessionHandle, WeakSessionHandle};
use super::retry::{ReconnectBudget, ReconnectPolicy};
use crate::infrastructure::messaging::{
    set_session_state, ControlEvent, ControlSender, SessionState, SessionStateObserver,
};
use crate::ports::outbound::{
    BindingId, EngineBinder, EngineError, EngineLossNotifier, PlaybackEngine,
};

/// Whether teardown should stop the engine instead of leaving it detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownPolicy {
    pub stop_on_task_clear: bool,
}

impl TeardownPolicy {
    /// Stop only when the user asked for it, something is playing and the
    /// host is actually finishing rather than going to the background.
    pub fn should_stop_engine(&self, host_finishing: bool, playing: bool) -> bool {
        self.stop_on_task_clear && playing && host_finishing
    }
}

/// Single logical connection to the playback engine.
pub struct SessionConnection {
    binder: Arc<dyn EngineBinder>,
    control: ControlSender,
    state: Arc<AtomicU8>,
    handle: Option<SessionHandle>,
    published: watch::Sender<Option<WeakSessionHandle>>,
    budget: ReconnectBudget,
    reconnecting: bool,
    /// Bumped on every bind and every release; events from older binds are stale.
    generation: u64,
    last_known_playing: bool,
}

impl SessionConnection {
    pub fn new(
        binder: Arc<dyn EngineBinder>,
        control: ControlSender,
        policy: ReconnectPolicy,
    ) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            binder,
            control,
            state: Arc::new(AtomicU8::new(SessionState::Idle.to_u8())),
            handle: None,
            published,
            budget: ReconnectBudget::new(policy),
            reconnecting: false,
            generation: 0,
            last_known_playing: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.observer().state()
    }

    pub fn observer(&self) -> SessionStateObserver {
        SessionStateObserver::new(Arc::clone(&self.state))
    }

    /// Last-value broadcast of the live handle; `None` while not connected.
    pub fn subscribe(&self) -> watch::Receiver<Option<WeakSessionHandle>> {
        self.published.subscribe()
    }

    pub fn current_handle(&self) -> Option<WeakSessionHandle> {
        self.handle.as_ref().map(SessionHandle::downgrade)
    }

    /// Request a bind. Returns false (and does nothing) while already
    /// connecting or connected.
    pub fn connect(&mut self) -> bool {
        let state = self.state();
        if matches!(state, SessionState::Connecting | SessionState::Connected) {
            tracing::debug!(state = %state, "Connect ignored, session already active");
            return false;
        }
        self.budget.reset();
        self.reconnecting = false;
        self.begin_bind(0);
        true
    }

    /// Release the binding.
    ///
    /// The handle is invalidated before this returns; the unbind itself runs
    /// in the background. A bind still in flight is released when its result
    /// arrives and is found stale.
    pub fn disconnect(&mut self) {
        let state = self.state();
        let active = matches!(state, SessionState::Connecting | SessionState::Connected);
        if !active && self.handle.is_none() {
            tracing::debug!(state = %state, "Disconnect ignored, nothing bound");
            return;
        }
        let released = self.dispose_handle();
        self.generation += 1;
        self.reconnecting = false;
        self.set_state(SessionState::Disconnected);
        tracing::info!(generation = self.generation, "Session disconnected");
        if released.is_some() {
            self.spawn_release(false, released);
        }
    }

    /// Host is being destroyed. Stops the engine when `policy` says so, then
    /// releases everything; the session ends in `Idle`.
    ///
    /// Returns whether the engine was told to stop.
    pub fn teardown(&mut self, host_finishing: bool, policy: TeardownPolicy) -> bool {
        let playing = match &self.handle {
            Some(handle) => handle.is_playing(),
            None => self.last_known_playing,
        };
        let stop_engine = policy.should_stop_engine(host_finishing, playing);

        let released = self.dispose_handle();
        self.generation += 1;
        self.reconnecting = false;
        self.last_known_playing = false;
        self.set_state(SessionState::Idle);

        tracing::info!(
            host_finishing,
            playing,
            stop_engine,
            "Session torn down"
        );
        if stop_engine || released.is_some() {
            self.spawn_release(stop_engine, released);
        }
        stop_engine
    }

    /// Apply the result of a bind started by this connection.
    pub fn on_bound(
        &mut self,
        generation: u64,
        result: Result<Arc<dyn PlaybackEngine>, EngineError>,
    ) {
        if generation != self.generation || self.state() != SessionState::Connecting {
            tracing::debug!(
                generation,
                current = self.generation,
                "Ignoring stale bind result"
            );
            if result.is_ok() {
                self.spawn_release(false, Some(generation));
            }
            return;
        }

        match result {
            Ok(engine) => {
                let handle = SessionHandle::new(generation, engine);
                self.published.send_replace(Some(handle.downgrade()));
                self.handle = Some(handle);
                self.reconnecting = false;
                self.budget.reset();
                self.set_state(SessionState::Connected);
                tracing::info!(generation, "Session connected");
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "Engine bind failed");
                if self.reconnecting {
                    if let Some(delay) = self.budget.next_delay_and_advance() {
                        self.retry(delay);
                        return;
                    }
                    tracing::warn!(
                        attempts = self.budget.attempts(),
                        "Reconnect attempts exhausted, staying disconnected"
                    );
                }
                self.reconnecting = false;
                self.set_state(SessionState::Disconnected);
            }
        }
    }

    /// The engine bound under `generation` died.
    pub fn on_engine_lost(&mut self, generation: u64) {
        if generation != self.generation || self.handle.is_none() {
            tracing::debug!(generation, current = self.generation, "Ignoring stale engine loss");
            return;
        }
        tracing::warn!(generation, "Playback engine lost");

        let released = self.dispose_handle();
        self.last_known_playing = false;
        self.set_state(SessionState::Lost);
        if released.is_some() {
            self.spawn_release(false, released);
        }

        self.reconnecting = true;
        match self.budget.next_delay_and_advance() {
            Some(delay) => self.retry(delay),
            None => {
                self.reconnecting = false;
                self.set_state(SessionState::Disconnected);
            }
        }
    }

    fn retry(&mut self, delay_ms: u64) {
        tracing::info!(
            attempt = self.budget.attempts(),
            max_attempts = self.budget.max_attempts(),
            delay_ms,
            "Reconnecting to playback engine"
        );
        self.begin_bind(delay_ms);
    }

    fn begin_bind(&mut self, delay_ms: u64) {
        self.generation += 1;
        let generation = self.generation;
        self.set_state(SessionState::Connecting);

        let binder = Arc::clone(&self.binder);
        let control = self.control.clone();
        let loss_control = self.control.clone();
        let on_lost = EngineLossNotifier::new(move || {
            loss_control.deliver(ControlEvent::EngineLost { generation });
        });

        tokio::spawn(async move {
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            let result = binder.bind(generation, on_lost).await;
            let bound = result.is_ok();
            if !control.deliver(ControlEvent::EngineBound { generation, result }) && bound {
                // nobody left to release it
                binder.unbind(generation).await;
            }
        });
    }

    fn spawn_release(&self, stop_engine: bool, binding: Option<BindingId>) {
        let binder = Arc::clone(&self.binder);
        tokio::spawn(async move {
            if stop_engine {
                binder.stop_engine().await;
            }
            if let Some(binding) = binding {
                binder.unbind(binding).await;
            }
        });
    }

    /// Invalidate the live handle. Returns the binding it was created under.
    fn dispose_handle(&mut self) -> Option<BindingId> {
        let handle = self.handle.take()?;
        let binding = handle.generation();
        self.last_known_playing = handle.is_playing();
        self.published.send_replace(None);
        handle.dispose();
        Some(binding)
    }

    fn set_state(&self, state: SessionState) {
        set_session_state(&self.state, state);
    }
}
