//! Holds the route that arrived before a navigation target existed.

use waveline_domain::RouteIntent;

/// Single-slot buffer for routes offered before the navigation target is ready.
///
/// Latest offer wins. Readiness is tracked per target instantiation: the
/// buffered route is handed out once for a given instantiation, and a
/// repeated ready signal for the same one hands out nothing.
#[derive(Debug, Default)]
pub struct PendingRouteBuffer {
    pending: Option<RouteIntent>,
    ready_target: Option<u64>,
    /// Highest target released so far; targets are numbered increasingly.
    last_released: u64,
}

impl PendingRouteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a route. Returns it back when a target is ready and it should be
    /// dispatched now; otherwise it replaces whatever was buffered.
    pub fn offer(&mut self, intent: RouteIntent) -> Option<RouteIntent> {
        if self.ready_target.is_some() {
            return Some(intent);
        }
        if let Some(dropped) = self.pending.replace(intent) {
            tracing::debug!(dropped = ?dropped, "Replacing buffered route");
        }
        None
    }

    /// Navigation target `target` became ready. Returns the buffered route,
    /// at most once per target. Targets already released never become ready
    /// again.
    pub fn on_target_ready(&mut self, target: u64) -> Option<RouteIntent> {
        if target <= self.last_released {
            tracing::debug!(
                navigation_target = target,
                "Ignoring ready signal for released target"
            );
            return None;
        }
        if self.ready_target == Some(target) {
            tracing::debug!(navigation_target = target, "Target already ready, nothing to replay");
            return None;
        }
        self.ready_target = Some(target);
        self.pending.take()
    }

    /// Navigation target `target` went away; later offers are buffered again.
    pub fn on_target_released(&mut self, target: u64) {
        self.last_released = self.last_released.max(target);
        if self.ready_target == Some(target) {
            self.ready_target = None;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_target.is_some()
    }

    pub fn pending(&self) -> Option<&RouteIntent> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveline_domain::ArtistId;

    fn search(query: &str) -> RouteIntent {
        RouteIntent::OpenSearch {
            query: query.into(),
        }
    }

    #[test]
    fn test_latest_offer_wins() {
        let mut buffer = PendingRouteBuffer::new();

        assert_eq!(buffer.offer(search("first")), None);
        assert_eq!(buffer.offer(search("second")), None);

        assert_eq!(buffer.on_target_ready(1), Some(search("second")));
        assert_eq!(buffer.pending(), None);
    }

    #[test]
    fn test_ready_with_empty_buffer_dispatches_nothing() {
        let mut buffer = PendingRouteBuffer::new();

        assert_eq!(buffer.on_target_ready(1), None);
        assert!(buffer.is_ready());
    }

    #[test]
    fn test_offer_while_ready_passes_through() {
        let mut buffer = PendingRouteBuffer::new();
        buffer.on_target_ready(1);

        let intent = RouteIntent::OpenArtist {
            artist_id: ArtistId::new("UC1").expect("valid id"),
        };
        assert_eq!(buffer.offer(intent.clone()), Some(intent));
        assert_eq!(buffer.pending(), None);
    }

    #[test]
    fn test_repeated_ready_for_same_target_replays_nothing() {
        let mut buffer = PendingRouteBuffer::new();
        buffer.offer(search("q"));

        assert!(buffer.on_target_ready(1).is_some());
        buffer.on_target_released(1);
        buffer.offer(search("again"));
        assert_eq!(buffer.on_target_ready(2), Some(search("again")));
        assert_eq!(buffer.on_target_ready(2), None);
    }

    #[test]
    fn test_late_ready_for_released_target_keeps_buffering() {
        let mut buffer = PendingRouteBuffer::new();
        buffer.on_target_ready(1);
        buffer.on_target_released(1);

        assert_eq!(buffer.on_target_ready(1), None);
        assert!(!buffer.is_ready());
        assert_eq!(buffer.offer(search("later")), None);
        assert_eq!(buffer.on_target_ready(2), Some(search("later")));
    }

    #[test]
    fn test_release_of_other_target_keeps_readiness() {
        let mut buffer = PendingRouteBuffer::new();
        buffer.on_target_ready(2);

        buffer.on_target_released(1);

        assert!(buffer.is_ready());
    }
}
