//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with the catalog, the playback
//! engine and the host without depending on concrete implementations.

pub mod catalog_port;
pub mod engine_port;
pub mod navigation_port;
pub mod preferences_port;
pub mod testing;

pub use catalog_port::{CatalogError, CatalogPort};
pub use engine_port::{
    BindingId, EngineBinder, EngineError, EngineLossNotifier, PlaybackEngine,
};
pub use navigation_port::NavigationPort;
pub use preferences_port::PreferencesPort;

// Re-export mock types when testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use catalog_port::MockCatalogPort;
#[cfg(any(test, feature = "testing"))]
pub use engine_port::MockPlaybackEngine;
#[cfg(any(test, feature = "testing"))]
pub use navigation_port::MockNavigationPort;
#[cfg(any(test, feature = "testing"))]
pub use preferences_port::MockPreferencesPort;
