//! Application services
//!
//! Each service covers one concern of turning host signals and external
//! references into engine commands and navigation. Services depend on port
//! traits, not concrete infrastructure implementations.

pub mod deep_link_router;
pub mod pending_route_buffer;
pub mod queue_resolver;
pub mod shortcuts;
pub mod voice_search;
pub mod volume_duck;

pub use deep_link_router::{parse_reference, DeepLinkRouter, IncomingReference};
pub use pending_route_buffer::PendingRouteBuffer;
pub use queue_resolver::QueueResolver;
pub use shortcuts::{initial_tab, ShortcutAction, ACTION_LIBRARY, ACTION_SEARCH};
pub use voice_search::VoiceEpisode;
pub use volume_duck::{VolumeDuckController, DEFAULT_DUCK_GAIN, UNITY_GAIN};
