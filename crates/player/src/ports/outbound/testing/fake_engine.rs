//! Recording fakes for the engine ports.
//!
//! `mockall` expectations get unwieldy for the engine: tests want to bind,
//! lose and rebind several times and then inspect everything that reached
//! each engine instance. These fakes just record.

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::watch;
use waveline_domain::{ResolvedQueue, TrackMetadata};

use crate::ports::outbound::{
    BindingId, EngineBinder, EngineError, EngineLossNotifier, PlaybackEngine,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Engine instance that records every command it receives.
pub struct FakeEngine {
    queues: Mutex<Vec<ResolvedQueue>>,
    volumes: Mutex<Vec<f32>>,
    playing: AtomicBool,
    current: watch::Sender<Option<TrackMetadata>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            queues: Mutex::new(Vec::new()),
            volumes: Mutex::new(Vec::new()),
            playing: AtomicBool::new(false),
            current,
        }
    }

    pub fn played_queues(&self) -> Vec<ResolvedQueue> {
        lock(&self.queues).clone()
    }

    pub fn volumes(&self) -> Vec<f32> {
        lock(&self.volumes).clone()
    }

    pub fn last_volume(&self) -> Option<f32> {
        lock(&self.volumes).last().copied()
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine for FakeEngine {
    fn play_queue(&self, queue: ResolvedQueue) -> Result<(), EngineError> {
        self.current.send_replace(queue.current.clone());
        lock(&self.queues).push(queue);
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn set_volume(&self, gain: f32) -> Result<(), EngineError> {
        lock(&self.volumes).push(gain);
        Ok(())
    }

    fn current_track(&self) -> watch::Receiver<Option<TrackMetadata>> {
        self.current.subscribe()
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

/// Binder that hands out `FakeEngine`s and records lifecycle calls.
///
/// Bind outcomes can be scripted with [`FakeBinder::fail_next_binds`]; once the
/// script runs out every bind succeeds.
#[derive(Default)]
pub struct FakeBinder {
    engines: Mutex<Vec<Arc<FakeEngine>>>,
    notifiers: Mutex<Vec<EngineLossNotifier>>,
    scripted_failures: Mutex<VecDeque<EngineError>>,
    live: Mutex<BTreeSet<BindingId>>,
    binds: AtomicUsize,
    unbinds: AtomicUsize,
    stops: AtomicUsize,
}

impl FakeBinder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next `count` binds fail.
    pub fn fail_next_binds(&self, count: usize) {
        let mut script = lock(&self.scripted_failures);
        for _ in 0..count {
            script.push_back(EngineError::BindFailed("engine unavailable".into()));
        }
    }

    pub fn bind_count(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }

    pub fn unbind_count(&self) -> usize {
        self.unbinds.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Bindings made and not yet released, in id order.
    pub fn live_bindings(&self) -> Vec<BindingId> {
        lock(&self.live).iter().copied().collect()
    }

    /// Most recently bound engine.
    pub fn last_engine(&self) -> Option<Arc<FakeEngine>> {
        lock(&self.engines).last().cloned()
    }

    pub fn engines(&self) -> Vec<Arc<FakeEngine>> {
        lock(&self.engines).clone()
    }

    /// Simulate the engine process dying under the most recent binding.
    pub fn kill_engine(&self) {
        let notifier = lock(&self.notifiers).last().cloned();
        if let Some(notifier) = notifier {
            notifier.engine_lost();
        }
    }
}

#[async_trait]
impl EngineBinder for FakeBinder {
    async fn bind(
        &self,
        binding: BindingId,
        on_lost: EngineLossNotifier,
    ) -> Result<Arc<dyn PlaybackEngine>, EngineError> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = lock(&self.scripted_failures).pop_front() {
            return Err(err);
        }
        let engine = Arc::new(FakeEngine::new());
        lock(&self.engines).push(Arc::clone(&engine));
        lock(&self.notifiers).push(on_lost);
        lock(&self.live).insert(binding);
        Ok(engine)
    }

    async fn unbind(&self, binding: BindingId) {
        self.unbinds.fetch_add(1, Ordering::SeqCst);
        lock(&self.live).remove(&binding);
    }

    async fn stop_engine(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        for engine in lock(&self.engines).iter() {
            engine.set_playing(false);
        }
    }
}
